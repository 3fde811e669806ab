//! Event notification for hosts
//!
//! Listeners are plain closures registered on a [`Cursor`](crate::Cursor)
//! or [`Registry`](crate::Registry). Events are delivered synchronously,
//! inside the call that raised them, in registration order.

use crate::engine::StepResult;
use std::fmt;

/// Something a listener is told about
#[derive(Debug, Clone, Copy)]
pub enum DialogueEvent<'a> {
    /// An action node is about to run (carries the action ID)
    ActionNode(i32),
    /// The current node changed, or an NPC line moved to its next segment
    NodeChange(&'a StepResult),
    /// The conversation reached an exit with no continuation
    End(&'a StepResult),
    /// A load request finished
    Loaded,
    /// All dialogues were unloaded
    Unloaded,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&DialogueEvent<'_>) + Send>;

/// Ordered list of registered listeners
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it runs after every listener registered before it
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&DialogueEvent<'_>) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver an event to every listener
    pub fn emit(&mut self, event: &DialogueEvent<'_>) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
