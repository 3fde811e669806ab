//! # Parley
//!
//! Step-driven runtime for branching NPC dialogue.
//!
//! A [`Registry`] discovers the dialogues a host ships and loads them on
//! demand. A [`Cursor`] walks one conversation: the host calls
//! [`Cursor::next`] whenever the player advances, renders the returned
//! [`StepResult`], and reacts to the events raised along the way. Action
//! nodes are handed to an [`ActionDispatcher`] the host supplies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use parley::prelude::*;
//!
//! let mut registry = Registry::new(DirectorySource::new("Dialogues"))?;
//! let guard = DialogueRef::new("guard");
//!
//! let mut cursor = Cursor::with_dispatcher(ActionLog::new());
//! cursor.subscribe(|event| {
//!     if let DialogueEvent::NodeChange(step) = event {
//!         println!("{:?}", step.current_segment().or(step.choices.first().map(String::as_str)));
//!     }
//! });
//!
//! let mut step = cursor.begin(&mut registry, &guard)?;
//! while !step.is_end {
//!     if step.paused_action {
//!         cursor.resume()?;
//!     }
//!     step = cursor.next()?;
//! }
//! cursor.end_dialogue();
//! # Ok::<(), parley::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `parley` command-line binary

// Re-export parleygraph
pub use parleygraph;

pub mod assign;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;

pub use assign::DialogueRef;
pub use engine::{Cursor, NodeKind, StepResult};
pub use error::{Error, Result};
pub use registry::Registry;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assign::DialogueRef;
    pub use crate::config::ParleyConfig;
    pub use crate::dispatch::{
        ActionDispatcher, ActionLog, ActionReceiver, DispatchedCall, NullDispatcher, ObjectTable,
    };
    pub use crate::engine::{Cursor, NodeKind, StepResult};
    pub use crate::error::{Error, Result};
    pub use crate::events::{DialogueEvent, ListenerId};
    pub use crate::registry::{DialogueEntry, Registry};

    pub use parleygraph::graph::ActionParam;
    pub use parleygraph::source::{DialogueSource, DirectorySource, MemorySource};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
