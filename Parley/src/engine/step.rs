//! Per-step snapshot handed to the host

use parleygraph::graph::{Action, NpcLine, PlayerChoiceSet};
use serde::Serialize;

/// Which kind of node a step is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Player,
    Npc,
    /// The conversation started on, or jumped to, an action node
    Action,
}

/// Snapshot of the current node after a step
///
/// Everything the UI needs to render a step. Only `selected_option` is meant
/// to be changed by the host, before the next call to `next()` on a player
/// node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub kind: NodeKind,
    /// The conversation has ended; call `end_dialogue()`
    pub is_end: bool,
    /// An action with "pause here" ran; call `resume()` before continuing
    pub paused_action: bool,
    pub node_id: i32,
    /// Choice texts (player nodes)
    pub choices: Vec<String>,
    /// Extra data of each choice, parallel to `choices`
    pub choice_extra_data: Vec<String>,
    /// Displayed text segments (NPC nodes)
    pub segments: Vec<String>,
    /// Index of the segment being shown
    pub segment_index: usize,
    /// Choice the player picked, read on the next step
    pub selected_option: usize,
    /// Extra data of the NPC line
    pub extra_data: String,
    /// Display tag of the NPC line
    pub tag: String,
    /// Tag of the player set
    pub player_tag: String,
}

impl StepResult {
    pub(crate) fn empty(kind: NodeKind, node_id: i32) -> Self {
        Self {
            kind,
            is_end: false,
            paused_action: false,
            node_id,
            choices: Vec::new(),
            choice_extra_data: Vec::new(),
            segments: Vec::new(),
            segment_index: 0,
            selected_option: 0,
            extra_data: String::new(),
            tag: String::new(),
            player_tag: String::new(),
        }
    }

    pub(crate) fn player(set: &PlayerChoiceSet) -> Self {
        Self {
            choices: set.choices.iter().map(|c| c.text.clone()).collect(),
            choice_extra_data: set.choices.iter().map(|c| c.extra_data.clone()).collect(),
            player_tag: set.tag.clone(),
            ..Self::empty(NodeKind::Player, set.id)
        }
    }

    pub(crate) fn npc(line: &NpcLine) -> Self {
        Self {
            segments: line.segments(),
            extra_data: line.extra_data.clone(),
            tag: line.tag.clone(),
            ..Self::empty(NodeKind::Npc, line.id)
        }
    }

    /// Placeholder while positioned on an action rather than a text node
    pub(crate) fn action(action: &Action) -> Self {
        Self::empty(NodeKind::Action, action.id)
    }

    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == NodeKind::Player
    }

    /// Whether the last segment is showing. A line without segments counts
    /// as being on its last segment.
    #[must_use]
    pub fn is_final_segment(&self) -> bool {
        self.segment_index + 1 >= self.segments.len()
    }

    /// The segment currently shown, if any
    #[must_use]
    pub fn current_segment(&self) -> Option<&str> {
        self.segments.get(self.segment_index).map(String::as_str)
    }
}
