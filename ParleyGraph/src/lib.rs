//! # ParleyGraph
//!
//! Data model and loader for branching NPC dialogue graphs.
//!
//! ## Formats
//!
//! - **Record** - the flat keyed JSON written by the dialogue editor
//!   (`playerDiags`, `pd_*`, `nd_*`, `ac_*`)
//! - **Typed** - a nested, self-describing [`GraphDocument`](formats::GraphDocument)
//!
//! ## Quick Start
//!
//! ```no_run
//! use parleygraph::prelude::*;
//!
//! let mut source = DirectorySource::new("Dialogues");
//! for name in source.names()? {
//!     let graph = load_graph(&source.read(&name)?)?;
//!     let report = validate_graph(&graph);
//!     println!("{name}: {} nodes, valid = {}", graph.node_count(), report.valid);
//! }
//! # Ok::<(), parleygraph::Error>(())
//! ```
//!
//! ### Converting Document Formats
//!
//! ```no_run
//! use parleygraph::formats::{read_graph_document, serialize_graph_document, DocumentFormat};
//!
//! let doc = read_graph_document("Dialogues/guard.json")?;
//! std::fs::write("guard.typed.json", serialize_graph_document(&doc, DocumentFormat::Typed)?)?;
//! # Ok::<(), parleygraph::Error>(())
//! ```

pub mod error;
pub mod export;
pub mod formats;
pub mod graph;
pub mod source;
pub mod validate;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::{
        DocumentFormat, GraphDocument, RecordDocument, RecordValue, parse_graph_document,
        read_graph_document, serialize_graph_document,
    };
    pub use crate::graph::{
        Action, ActionId, ActionParam, Choice, Graph, NodeRef, NpcLine, NpcLineId,
        PlayerChoiceSet, PlayerSetId, build_graph, load_graph,
    };
    pub use crate::source::{DialogueSource, DirectorySource, MemorySource};
    pub use crate::validate::{GraphValidation, validate_graph};
    pub use crate::export::generate_outline;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
