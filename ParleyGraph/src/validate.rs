//! Dialogue graph validation
//!
//! Structural checks that loading alone does not catch. Loading already
//! guarantees every link resolves; this module looks at what the traversal
//! engine would trip over at runtime.

use crate::graph::{ActionId, Graph, NodeRef};
use std::collections::{HashMap, HashSet, VecDeque};

/// Result of graph validation
#[derive(Clone, Debug, Default)]
pub struct GraphValidation {
    /// Whether the graph can be traversed safely
    pub valid: bool,
    /// Problems that break traversal
    pub errors: Vec<String>,
    /// Suspicious content that still traverses
    pub warnings: Vec<String>,
}

/// Validate a loaded graph
///
/// Errors:
/// - start ID resolves to no node
/// - an ID used by more than one node
/// - a cycle of non-pausing actions, which would never return control
///
/// Warnings:
/// - nodes unreachable from the start node
/// - player sets without choices
/// - NPC lines with no displayable text
#[must_use]
pub fn validate_graph(graph: &Graph) -> GraphValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let start = graph.find_start(graph.start);
    if start.is_none() {
        errors.push(format!("Start node {} does not exist", graph.start));
    }

    // ID collisions, within and across node kinds
    let mut seen: HashMap<i32, NodeRef> = HashMap::new();
    for node in graph.nodes() {
        let id = graph.node_id(node);
        if let Some(first) = seen.get(&id) {
            errors.push(format!(
                "ID {} is used by both a {} and a {}",
                id,
                first.kind_name(),
                node.kind_name()
            ));
        } else {
            seen.insert(id, node);
        }
    }

    for index in action_cycles(graph) {
        let action = graph.action(index);
        errors.push(format!(
            "Action {} ({}.{}) is part of a cycle with no pause",
            action.id, action.target, action.method
        ));
    }

    if let Some(start) = start {
        let reachable = reachable_from(graph, start);
        for node in graph.nodes() {
            if !reachable.contains(&node) {
                warnings.push(format!(
                    "{} {} is unreachable from the start node",
                    capitalize(node.kind_name()),
                    graph.node_id(node)
                ));
            }
        }
    }

    for set in &graph.player_sets {
        if set.choices.is_empty() {
            warnings.push(format!("Player set {} has no choices", set.id));
        }
    }
    for line in &graph.npc_lines {
        if line.segments().is_empty() {
            warnings.push(format!("NPC line {} has no displayable text", line.id));
        }
    }

    GraphValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Every node reachable from `start` by following outgoing links
#[must_use]
pub fn reachable_from(graph: &Graph, start: NodeRef) -> HashSet<NodeRef> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        queue.extend(graph.successors(node));
    }
    visited
}

/// Actions on a `next_action` cycle where no member pauses, sorted
fn action_cycles(graph: &Graph) -> Vec<ActionId> {
    let mut on_cycle = HashSet::new();
    for i in 0..graph.actions.len() {
        let mut path = Vec::new();
        let mut current = Some(ActionId(i));
        while let Some(id) = current {
            if let Some(pos) = path.iter().position(|p| *p == id) {
                on_cycle.extend(path[pos..].iter().copied());
                break;
            }
            let action = graph.action(id);
            if action.pause_here {
                break;
            }
            path.push(id);
            current = action.next_action;
        }
    }
    let mut cycle: Vec<ActionId> = on_cycle.into_iter().collect();
    cycle.sort();
    cycle
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::load_graph;

    #[test]
    fn test_valid_graph() {
        let graph = load_graph(
            r#"{
            "start_point": 0,
            "player_sets": [{"id": 1, "choices": [{"text": "Bye"}]}],
            "npc_lines": [{"id": 0, "text": "Hi", "next_set": 0}]
        }"#,
        )
        .unwrap();
        let result = validate_graph(&graph);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_start_and_collision() {
        let graph = load_graph(
            r#"{
            "start_point": 9,
            "player_sets": [{"id": 1, "choices": []}],
            "npc_lines": [{"id": 1, "text": "  "}]
        }"#,
        )
        .unwrap();
        let result = validate_graph(&graph);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("Start node 9"));
        assert!(result.errors[1].contains("player set and a npc line"));
        assert!(result.warnings.iter().any(|w| w.contains("no choices")));
        assert!(result.warnings.iter().any(|w| w.contains("no displayable text")));
    }

    #[test]
    fn test_non_pausing_action_cycle() {
        let graph = load_graph(
            r#"{
            "start_point": 0,
            "player_sets": [],
            "npc_lines": [{"id": 0, "text": "Hi", "action": 0}],
            "actions": [
                {"id": 1, "target": "A", "method": "Run", "next_action": 1},
                {"id": 2, "target": "B", "method": "Run", "next_action": 0}
            ]
        }"#,
        )
        .unwrap();
        let result = validate_graph(&graph);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_pausing_action_breaks_cycle() {
        let graph = load_graph(
            r#"{
            "start_point": 0,
            "player_sets": [],
            "npc_lines": [{"id": 0, "text": "Hi", "action": 0}],
            "actions": [
                {"id": 1, "target": "A", "method": "Run", "next_action": 1},
                {"id": 2, "target": "B", "method": "Run", "pause_here": true, "next_action": 0}
            ]
        }"#,
        )
        .unwrap();
        assert!(validate_graph(&graph).valid);
    }

    #[test]
    fn test_unreachable_warning() {
        let graph = load_graph(
            r#"{
            "start_point": 0,
            "player_sets": [],
            "npc_lines": [{"id": 0, "text": "Hi"}, {"id": 5, "text": "Orphan"}]
        }"#,
        )
        .unwrap();
        let result = validate_graph(&graph);
        assert!(result.valid);
        assert_eq!(result.warnings, vec!["Npc line 5 is unreachable from the start node"]);
    }
}
