//! Dialogue graph model
//!
//! A [`Graph`] is an arena: the three node lists own every node, and links
//! between nodes are handles into those lists. Cycles (an NPC line looping
//! back to an earlier choice set, an action chaining to itself) need no
//! special treatment and the whole graph can be dropped and rebuilt freely.
//!
//! # Usage
//!
//! ```
//! use parleygraph::graph::{load_graph, NodeRef};
//!
//! let graph = load_graph(r#"{
//!     "start_point": 0,
//!     "player_sets": [],
//!     "npc_lines": [{"id": 0, "text": "Hello<br>World"}]
//! }"#)?;
//!
//! let Some(NodeRef::Npc(line)) = graph.find_start(0) else { unreachable!() };
//! assert_eq!(graph.npc(line).segments(), vec!["Hello", "World"]);
//! # Ok::<(), parleygraph::Error>(())
//! ```

mod loader;
mod text;
mod types;

pub use loader::{build_graph, load_graph};
pub use text::{SEGMENT_BREAK, split_segments};
pub use types::*;

/// One loaded conversation: every node plus the default start point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    /// ID of the default start node
    pub start: i32,
    /// Load tag from the document
    pub load_tag: String,
    pub player_sets: Vec<PlayerChoiceSet>,
    pub npc_lines: Vec<NpcLine>,
    pub actions: Vec<Action>,
}

impl Graph {
    /// Get a player set by handle.
    ///
    /// # Panics
    /// Panics if the handle was not produced by this graph.
    #[must_use]
    pub fn player(&self, id: PlayerSetId) -> &PlayerChoiceSet {
        &self.player_sets[id.0]
    }

    /// Get an NPC line by handle.
    ///
    /// # Panics
    /// Panics if the handle was not produced by this graph.
    #[must_use]
    pub fn npc(&self, id: NpcLineId) -> &NpcLine {
        &self.npc_lines[id.0]
    }

    /// Get an action by handle.
    ///
    /// # Panics
    /// Panics if the handle was not produced by this graph.
    #[must_use]
    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    fn find_player(&self, id: i32) -> Option<NodeRef> {
        self.player_sets
            .iter()
            .position(|n| n.id == id)
            .map(|i| NodeRef::Player(PlayerSetId(i)))
    }

    fn find_npc(&self, id: i32) -> Option<NodeRef> {
        self.npc_lines
            .iter()
            .position(|n| n.id == id)
            .map(|i| NodeRef::Npc(NpcLineId(i)))
    }

    fn find_action(&self, id: i32) -> Option<NodeRef> {
        self.actions
            .iter()
            .position(|n| n.id == id)
            .map(|i| NodeRef::Action(ActionId(i)))
    }

    /// Resolve a start ID. NPC lines are searched first, then player sets,
    /// then actions; the first match wins.
    #[must_use]
    pub fn find_start(&self, id: i32) -> Option<NodeRef> {
        self.find_npc(id)
            .or_else(|| self.find_player(id))
            .or_else(|| self.find_action(id))
    }

    /// Resolve a jump target. Player sets are searched first, then NPC
    /// lines, then actions; the first match wins.
    #[must_use]
    pub fn find_node(&self, id: i32) -> Option<NodeRef> {
        self.find_player(id)
            .or_else(|| self.find_npc(id))
            .or_else(|| self.find_action(id))
    }

    /// ID of the node behind a handle
    #[must_use]
    pub fn node_id(&self, node: NodeRef) -> i32 {
        match node {
            NodeRef::Player(p) => self.player(p).id,
            NodeRef::Npc(n) => self.npc(n).id,
            NodeRef::Action(a) => self.action(a).id,
        }
    }

    /// First non-empty tag among the player sets
    #[must_use]
    pub fn first_player_tag(&self) -> Option<&str> {
        self.player_sets
            .iter()
            .map(|n| n.tag.as_str())
            .find(|t| !t.is_empty())
    }

    /// First non-empty tag among the NPC lines
    #[must_use]
    pub fn first_npc_tag(&self) -> Option<&str> {
        self.npc_lines
            .iter()
            .map(|n| n.tag.as_str())
            .find(|t| !t.is_empty())
    }

    /// Outgoing links of a node, in traversal priority order
    #[must_use]
    pub fn successors(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        match node {
            NodeRef::Player(p) => {
                for choice in &self.player(p).choices {
                    out.extend(choice.action.map(NodeRef::Action));
                    out.extend(choice.answer.map(NodeRef::Npc));
                }
            }
            NodeRef::Npc(n) => {
                let line = self.npc(n);
                out.extend(line.action.map(NodeRef::Action));
                out.extend(line.next_set.map(NodeRef::Player));
                out.extend(line.next_line.map(NodeRef::Npc));
            }
            NodeRef::Action(a) => {
                let action = self.action(a);
                out.extend(action.next_action.map(NodeRef::Action));
                out.extend(action.next_line.map(NodeRef::Npc));
                out.extend(action.next_set.map(NodeRef::Player));
            }
        }
        out
    }

    /// Every node handle, player sets first
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        let players = (0..self.player_sets.len()).map(|i| NodeRef::Player(PlayerSetId(i)));
        let npcs = (0..self.npc_lines.len()).map(|i| NodeRef::Npc(NpcLineId(i)));
        let actions = (0..self.actions.len()).map(|i| NodeRef::Action(ActionId(i)));
        players.chain(npcs).chain(actions)
    }

    /// Check whether a handle points into this graph
    #[must_use]
    pub fn contains(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::Player(p) => p.0 < self.player_sets.len(),
            NodeRef::Npc(n) => n.0 < self.npc_lines.len(),
            NodeRef::Action(a) => a.0 < self.actions.len(),
        }
    }

    /// Count total nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.player_sets.len() + self.npc_lines.len() + self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        load_graph(
            r#"{
            "start_point": 5,
            "player_sets": [{"id": 5, "tag": "", "choices": [{"text": "a", "answer": 0}]},
                            {"id": 9, "tag": "Hero", "choices": []}],
            "npc_lines": [{"id": 5, "text": "shared id", "tag": "Bob"}],
            "actions": [{"id": 6, "target": "Door", "method": "Open"}]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_search_orders_differ() {
        let graph = graph();
        // Start resolution prefers NPC lines, jumps prefer player sets
        assert_eq!(graph.find_start(5), Some(NodeRef::Npc(NpcLineId(0))));
        assert_eq!(graph.find_node(5), Some(NodeRef::Player(PlayerSetId(0))));
        assert_eq!(graph.find_node(6), Some(NodeRef::Action(ActionId(0))));
        assert_eq!(graph.find_node(42), None);
    }

    #[test]
    fn test_first_tags_skip_empty() {
        let graph = graph();
        assert_eq!(graph.first_player_tag(), Some("Hero"));
        assert_eq!(graph.first_npc_tag(), Some("Bob"));
        assert_eq!(Graph::default().first_npc_tag(), None);
    }

    #[test]
    fn test_successors_and_nodes() {
        let graph = graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.nodes().count(), 4);
        assert_eq!(
            graph.successors(NodeRef::Player(PlayerSetId(0))),
            vec![NodeRef::Npc(NpcLineId(0))]
        );
        assert!(graph.successors(NodeRef::Action(ActionId(0))).is_empty());
    }
}
