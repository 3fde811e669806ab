//! Dialogue graph node types
//!
//! Nodes refer to each other through arena handles ([`PlayerSetId`],
//! [`NpcLineId`], [`ActionId`]) into the owning [`Graph`](super::Graph).
//! A `None` link means the conversation ends at that exit.

use super::text::split_segments;
use std::fmt;

/// Handle to a [`PlayerChoiceSet`] in its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerSetId(pub usize);

/// Handle to an [`NpcLine`] in its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcLineId(pub usize);

/// Handle to an [`Action`] in its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

/// Handle to a node of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Player(PlayerSetId),
    Npc(NpcLineId),
    Action(ActionId),
}

impl NodeRef {
    /// Short kind name for messages
    #[must_use]
    pub fn kind_name(self) -> &'static str {
        match self {
            NodeRef::Player(_) => "player set",
            NodeRef::Npc(_) => "npc line",
            NodeRef::Action(_) => "action",
        }
    }
}

/// A point where the player picks one of several responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerChoiceSet {
    pub id: i32,
    pub tag: String,
    pub choices: Vec<Choice>,
}

/// One selectable response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choice {
    pub text: String,
    pub extra_data: String,
    /// The set this choice belongs to, as recorded by the editor
    pub input_set: Option<PlayerSetId>,
    /// NPC line that answers this choice
    pub answer: Option<NpcLineId>,
    /// Action run before the answer
    pub action: Option<ActionId>,
}

impl Choice {
    /// Whether selecting this choice leads anywhere
    #[must_use]
    pub fn has_exits(&self) -> bool {
        self.answer.is_some() || self.action.is_some()
    }
}

/// One or more NPC text segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcLine {
    pub id: i32,
    /// Raw text; `<br>` separates displayed segments
    pub text: String,
    pub extra_data: String,
    /// Display tag (usually the speaker name)
    pub tag: String,
    pub next_set: Option<PlayerSetId>,
    pub next_line: Option<NpcLineId>,
    pub action: Option<ActionId>,
}

impl NpcLine {
    /// Displayed segments of the raw text
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        split_segments(&self.text)
    }

    #[must_use]
    pub fn has_exits(&self) -> bool {
        self.next_set.is_some() || self.next_line.is_some() || self.action.is_some()
    }
}

/// Typed argument passed along with an action call
#[derive(Debug, Clone, PartialEq)]
pub enum ActionParam {
    None,
    Bool(bool),
    Str(String),
    Int(i32),
    Float(f32),
}

impl fmt::Display for ActionParam {
    /// Argument as written in a call, empty for [`ActionParam::None`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionParam::None => Ok(()),
            ActionParam::Bool(b) => write!(f, "{b}"),
            ActionParam::Str(s) => write!(f, "{s:?}"),
            ActionParam::Int(i) => write!(f, "{i}"),
            ActionParam::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A scripted side effect, optionally chained to further nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: i32,
    /// Name of the object(s) receiving the call
    pub target: String,
    /// Method invoked on each receiver
    pub method: String,
    pub param: ActionParam,
    /// Stop traversal after this action until the host resumes
    pub pause_here: bool,
    /// Start node to use the next time the dialogue begins
    pub override_start: Option<i32>,
    /// New display name for the active dialogue reference
    pub rename: Option<String>,
    pub next_set: Option<PlayerSetId>,
    pub next_line: Option<NpcLineId>,
    pub next_action: Option<ActionId>,
}

impl Action {
    #[must_use]
    pub fn has_exits(&self) -> bool {
        self.next_set.is_some() || self.next_line.is_some() || self.next_action.is_some()
    }
}
