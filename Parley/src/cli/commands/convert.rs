//! CLI command: convert between document formats

use parleygraph::formats::{DocumentFormat, read_graph_document, serialize_graph_document};
use parleygraph::graph::build_graph;
use std::fs;
use std::path::Path;

/// Convert `source` (either format) to `format`, writing `destination`
///
/// The document is built into a graph first so broken links are caught
/// before anything is written.
pub fn execute(source: &Path, destination: &Path, format: DocumentFormat) -> anyhow::Result<()> {
    let doc = read_graph_document(source)?;
    let graph = build_graph(&doc)?;
    fs::write(destination, serialize_graph_document(&doc, format)?)?;

    println!(
        "Converted {} -> {} ({}, {} nodes)",
        source.display(),
        destination.display(),
        format.as_str(),
        graph.node_count()
    );
    Ok(())
}
