//! Text outline export for dialogue graphs

use crate::graph::{Graph, NodeRef};
use std::collections::HashSet;
use std::fmt::Write;

/// Generate an indented text outline of a dialogue graph
///
/// Walks depth-first from the start node. Each node is written once; later
/// references to it are shown as `-> [KIND id]`. Exits with no continuation
/// are marked `[END]`.
#[must_use]
pub fn generate_outline(name: &str, graph: &Graph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dialogue: {name}");
    if !graph.load_tag.is_empty() {
        let _ = writeln!(out, "Load tag: {}", graph.load_tag);
    }
    let _ = writeln!(out, "Nodes: {}", graph.node_count());

    match graph.find_start(graph.start) {
        Some(start) => render_node(graph, start, 0, &mut out, &mut HashSet::new()),
        None => {
            let _ = writeln!(out, "Start node {} not found", graph.start);
        }
    }
    out
}

fn label(graph: &Graph, node: NodeRef) -> String {
    let kind = match node {
        NodeRef::Player(_) => "PLAYER",
        NodeRef::Npc(_) => "NPC",
        NodeRef::Action(_) => "ACTION",
    };
    format!("[{kind} {}]", graph.node_id(node))
}

fn render_link(
    graph: &Graph,
    link: Option<NodeRef>,
    depth: usize,
    out: &mut String,
    visited: &mut HashSet<NodeRef>,
) {
    match link {
        Some(node) => render_node(graph, node, depth, out, visited),
        None => {
            let _ = writeln!(out, "{}[END]", "  ".repeat(depth));
        }
    }
}

fn render_node(
    graph: &Graph,
    node: NodeRef,
    depth: usize,
    out: &mut String,
    visited: &mut HashSet<NodeRef>,
) {
    let indent = "  ".repeat(depth);
    if !visited.insert(node) {
        let _ = writeln!(out, "{indent}-> {}", label(graph, node));
        return;
    }

    match node {
        NodeRef::Player(id) => {
            let set = graph.player(id);
            let tag = if set.tag.is_empty() { String::new() } else { format!(" {}", set.tag) };
            let _ = writeln!(out, "{indent}{}{tag}", label(graph, node));
            for (i, choice) in set.choices.iter().enumerate() {
                let _ = writeln!(out, "{indent}  {i}) {:?}", choice.text);
                if let Some(action) = choice.action {
                    render_node(graph, NodeRef::Action(action), depth + 2, out, visited);
                }
                if choice.action.is_none() || choice.answer.is_some() {
                    render_link(graph, choice.answer.map(NodeRef::Npc), depth + 2, out, visited);
                }
            }
        }
        NodeRef::Npc(id) => {
            let line = graph.npc(id);
            let speaker = if line.tag.is_empty() { String::new() } else { format!(" {}:", line.tag) };
            let _ = writeln!(
                out,
                "{indent}{}{speaker} {}",
                label(graph, node),
                line.segments().join(" / ")
            );
            if let Some(action) = line.action {
                render_node(graph, NodeRef::Action(action), depth + 1, out, visited);
            }
            let next = line
                .next_set
                .map(NodeRef::Player)
                .or(line.next_line.map(NodeRef::Npc));
            if next.is_some() || line.action.is_none() {
                render_link(graph, next, depth + 1, out, visited);
            }
        }
        NodeRef::Action(id) => {
            let action = graph.action(id);
            let pause = if action.pause_here { " [PAUSE]" } else { "" };
            let _ = writeln!(
                out,
                "{indent}{} {}.{}({}){pause}",
                label(graph, node),
                action.target,
                action.method,
                action.param
            );
            let next = action
                .next_action
                .map(NodeRef::Action)
                .or(action.next_line.map(NodeRef::Npc))
                .or(action.next_set.map(NodeRef::Player));
            render_link(graph, next, depth + 1, out, visited);
        }
    }
}
