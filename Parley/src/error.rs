//! Error types for Parley

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Caller Errors ====================
    /// A step operation was called with no conversation running.
    #[error("no conversation is active; call begin() first")]
    NoActiveConversation,

    /// `begin()` was called while a conversation is still running.
    #[error("a conversation is already active; call end_dialogue() first")]
    ConversationActive,

    /// `next()` was called while an action holds the conversation.
    #[error("conversation is paused on action {0}; call resume() first")]
    ActionPaused(i32),

    /// The selected option does not exist on the current player set.
    #[error("option {index} is out of range ({count} choices)")]
    InvalidOption {
        /// The selected index.
        index: usize,
        /// Number of choices on the node.
        count: usize,
    },

    // ==================== Content Errors ====================
    /// No dialogue with this name is registered.
    #[error("unknown dialogue '{0}'")]
    UnknownDialogue(String),

    /// The start ID of a dialogue resolves to no node.
    #[error("start node {id} not found in dialogue '{dialogue}'")]
    StartNodeNotFound {
        /// Dialogue name.
        dialogue: String,
        /// The effective start ID.
        id: i32,
    },

    /// A jump target does not exist in the active dialogue.
    #[error("no node with ID {0} in the active dialogue")]
    NodeNotFound(i32),

    /// Non-pausing actions chain into each other forever.
    #[error("action {0} is part of a chain that never pauses or reaches a node")]
    ActionChainCycle(i32),

    // ==================== Loading Errors ====================
    /// Loading or decoding a dialogue document failed.
    #[error("ParleyGraph error: {0}")]
    Graph(#[from] parleygraph::Error),

    /// A selective load matched no registered dialogue.
    #[error("found no dialogue(s) to load for {0}")]
    NothingMatched(String),

    // ==================== Configuration Errors ====================
    /// IO error from reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
