//! Build a [`Graph`] from a [`GraphDocument`]
//!
//! This is the second loading pass. The first pass (record to typed document)
//! checks field presence and kinds; this one checks that every link index
//! lands inside its target list, so the engine never sees a dangling handle.

use super::types::{
    Action, ActionId, ActionParam, Choice, NpcLine, NpcLineId, PlayerChoiceSet, PlayerSetId,
};
use super::Graph;
use crate::error::{Error, Result};
use crate::formats::schema::{ActionRecord, GraphDocument, ParamKind};
use crate::formats::parse_graph_document;

/// Bounds-checks link indices against the list sizes of one document
struct Linker {
    players: usize,
    npcs: usize,
    actions: usize,
}

impl Linker {
    fn check(from: impl FnOnce() -> String, kind: &'static str, index: usize, count: usize) -> Result<usize> {
        if index < count {
            Ok(index)
        } else {
            Err(Error::DanglingLink {
                from: from(),
                kind,
                index,
                count,
            })
        }
    }

    fn player(&self, link: Option<usize>, from: impl FnOnce() -> String) -> Result<Option<PlayerSetId>> {
        link.map(|i| Self::check(from, "player set", i, self.players).map(PlayerSetId))
            .transpose()
    }

    fn npc(&self, link: Option<usize>, from: impl FnOnce() -> String) -> Result<Option<NpcLineId>> {
        link.map(|i| Self::check(from, "npc line", i, self.npcs).map(NpcLineId))
            .transpose()
    }

    fn action(&self, link: Option<usize>, from: impl FnOnce() -> String) -> Result<Option<ActionId>> {
        link.map(|i| Self::check(from, "action", i, self.actions).map(ActionId))
            .transpose()
    }
}

fn action_param(record: &ActionRecord) -> ActionParam {
    match record.param_kind {
        ParamKind::None => ActionParam::None,
        ParamKind::Bool => ActionParam::Bool(record.param_bool),
        ParamKind::String => ActionParam::Str(record.param_string.clone()),
        ParamKind::Int => ActionParam::Int(record.param_int),
        ParamKind::Float => ActionParam::Float(record.param_float),
    }
}

/// Resolve all links of a document into an arena graph.
///
/// # Errors
/// Returns [`Error::DanglingLink`] for the first link whose index is past
/// the end of the list it refers to.
pub fn build_graph(doc: &GraphDocument) -> Result<Graph> {
    let linker = Linker {
        players: doc.player_sets.len(),
        npcs: doc.npc_lines.len(),
        actions: doc.actions.len(),
    };

    let mut player_sets = Vec::with_capacity(doc.player_sets.len());
    for (i, set) in doc.player_sets.iter().enumerate() {
        let mut choices = Vec::with_capacity(set.choices.len());
        for (j, choice) in set.choices.iter().enumerate() {
            let from = || format!("player set #{i} choice #{j}");
            choices.push(Choice {
                text: choice.text.clone(),
                extra_data: choice.extra_data.clone(),
                input_set: linker.player(choice.input_set, from)?,
                answer: linker.npc(choice.answer, from)?,
                action: linker.action(choice.action, from)?,
            });
        }
        player_sets.push(PlayerChoiceSet {
            id: set.id,
            tag: set.tag.clone(),
            choices,
        });
    }

    let mut npc_lines = Vec::with_capacity(doc.npc_lines.len());
    for (i, line) in doc.npc_lines.iter().enumerate() {
        let from = || format!("npc line #{i}");
        npc_lines.push(NpcLine {
            id: line.id,
            text: line.text.clone(),
            extra_data: line.extra_data.clone(),
            tag: line.tag.clone(),
            next_set: linker.player(line.next_set, from)?,
            next_line: linker.npc(line.next_line, from)?,
            action: linker.action(line.action, from)?,
        });
    }

    let mut actions = Vec::with_capacity(doc.actions.len());
    for (i, record) in doc.actions.iter().enumerate() {
        let from = || format!("action #{i}");
        actions.push(Action {
            id: record.id,
            target: record.target.clone(),
            method: record.method.clone(),
            param: action_param(record),
            pause_here: record.pause_here,
            override_start: record.override_start,
            rename: record.rename.clone(),
            next_set: linker.player(record.next_set, from)?,
            next_line: linker.npc(record.next_line, from)?,
            next_action: linker.action(record.next_action, from)?,
        });
    }

    tracing::debug!(
        "Built graph: {} player sets, {} npc lines, {} actions",
        player_sets.len(),
        npc_lines.len(),
        actions.len()
    );

    Ok(Graph {
        start: doc.start_point,
        load_tag: doc.load_tag.clone(),
        player_sets,
        npc_lines,
        actions,
    })
}

/// Parse and build a graph from document text in either format.
///
/// # Errors
/// Returns an error if the text does not parse or a link dangles.
pub fn load_graph(content: &str) -> Result<Graph> {
    let doc = parse_graph_document(content)?;
    build_graph(&doc)
}
