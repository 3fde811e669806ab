//! Typed dialogue document schema
//!
//! These types are the validated-once form of a dialogue document. The flat
//! record format is converted into a [`GraphDocument`] in a single pass (see
//! [`GraphDocument::from_record`]); after that no field is looked up by name
//! again. A `GraphDocument` can also be stored directly as JSON, which is the
//! "typed" on-disk format the converter produces.
//!
//! Links are still indices into the sibling lists here. They become arena
//! handles when the document is built into a [`Graph`](crate::graph::Graph).

mod convert;

use serde::{Deserialize, Serialize};

/// A complete dialogue document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// ID of the node the conversation starts at
    pub start_point: i32,
    /// Optional load tag used for grouped loading
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub load_tag: String,
    /// Player choice sets, in document order
    pub player_sets: Vec<PlayerSetRecord>,
    /// NPC lines, in document order
    #[serde(default)]
    pub npc_lines: Vec<NpcLineRecord>,
    /// Action nodes, in document order
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

/// A player choice set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetRecord {
    pub id: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default)]
    pub choices: Vec<ChoiceRecord>,
}

/// One selectable line inside a player choice set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_data: String,
    /// Index of the owning player set (editor bookkeeping)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_set: Option<usize>,
    /// Index of the NPC line answering this choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<usize>,
    /// Index of the action triggered by this choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<usize>,
}

/// An NPC line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcLineRecord {
    pub id: i32,
    /// Raw text, possibly containing `<br>` segment breaks
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_data: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_set: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<usize>,
}

/// Parameter kind of an action call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    None,
    Bool,
    String,
    Int,
    Float,
}

impl ParamKind {
    /// Decode the numeric kind used by the record format
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ParamKind::None),
            1 => Some(ParamKind::Bool),
            2 => Some(ParamKind::String),
            3 => Some(ParamKind::Int),
            4 => Some(ParamKind::Float),
            _ => None,
        }
    }

    /// Numeric kind used by the record format
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            ParamKind::None => 0,
            ParamKind::Bool => 1,
            ParamKind::String => 2,
            ParamKind::Int => 3,
            ParamKind::Float => 4,
        }
    }
}

/// An action node: a scripted call plus optional continuation links
///
/// All parameter slots are stored, matching the editor. Only the slot named
/// by `param_kind` is passed to the receiver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: i32,
    /// Name of the object(s) receiving the call
    pub target: String,
    /// Method invoked on each receiver
    pub method: String,
    #[serde(default)]
    pub pause_here: bool,
    #[serde(default)]
    pub param_kind: ParamKind,
    #[serde(default)]
    pub param_bool: bool,
    #[serde(default)]
    pub param_string: String,
    #[serde(default)]
    pub param_int: i32,
    #[serde(default)]
    pub param_float: f32,
    /// Start node to use the next time this dialogue begins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_start: Option<i32>,
    /// New display name for the dialogue reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_set: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<usize>,
}

impl GraphDocument {
    /// Create an empty document starting at `start_point`
    #[must_use]
    pub fn new(start_point: i32) -> Self {
        Self {
            start_point,
            load_tag: String::new(),
            player_sets: Vec::new(),
            npc_lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Total number of nodes across all kinds
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.player_sets.len() + self.npc_lines.len() + self.actions.len()
    }
}
