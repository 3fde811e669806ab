//! Dialogue references
//!
//! A [`DialogueRef`] is what the host attaches to a conversation partner:
//! which dialogue it speaks, the name shown for it, a pending start-node
//! override and how many conversations it has had. Actions can rename it and
//! override its next start node, so the state lives behind a shared lock and
//! clones of one reference see the same values.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct RefState {
    dialogue: String,
    display_name: String,
    override_start: Option<i32>,
    interaction_count: u32,
}

/// Shared handle to one conversation partner's dialogue state
#[derive(Debug, Clone)]
pub struct DialogueRef {
    inner: Arc<Mutex<RefState>>,
}

impl DialogueRef {
    /// Reference to the dialogue registered as `dialogue`, displayed under
    /// the same name
    pub fn new(dialogue: impl Into<String>) -> Self {
        let dialogue = dialogue.into();
        Self {
            inner: Arc::new(Mutex::new(RefState {
                display_name: dialogue.clone(),
                dialogue,
                override_start: None,
                interaction_count: 0,
            })),
        }
    }

    #[must_use]
    pub fn with_display_name(self, name: impl Into<String>) -> Self {
        self.set_display_name(name);
        self
    }

    fn state(&self) -> MutexGuard<'_, RefState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registry name of the dialogue this reference speaks
    #[must_use]
    pub fn dialogue(&self) -> String {
        self.state().dialogue.clone()
    }

    /// Point this reference at another dialogue
    pub fn set_dialogue(&self, dialogue: impl Into<String>) {
        self.state().dialogue = dialogue.into();
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.state().display_name.clone()
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        self.state().display_name = name.into();
    }

    /// Start node used instead of the dialogue's own on the next begin
    #[must_use]
    pub fn override_start(&self) -> Option<i32> {
        self.state().override_start
    }

    pub fn set_override_start(&self, id: Option<i32>) {
        self.state().override_start = id;
    }

    /// Clear and return the start override
    pub fn take_override_start(&self) -> Option<i32> {
        self.state().override_start.take()
    }

    /// Number of finished conversations
    #[must_use]
    pub fn interaction_count(&self) -> u32 {
        self.state().interaction_count
    }

    pub(crate) fn record_interaction(&self) {
        let mut state = self.state();
        state.interaction_count = state.interaction_count.saturating_add(1);
    }

    /// Whether two handles share the same state
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
