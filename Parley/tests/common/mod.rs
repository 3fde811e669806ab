//! Shared helpers for Parley integration tests

#![allow(dead_code)]

use parley::prelude::*;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Registry over `tests/fixtures` (merchant, guard and a broken document)
pub fn fixture_registry() -> Registry {
    Registry::new(DirectorySource::new(fixtures_dir())).unwrap()
}

/// Registry holding a single in-memory dialogue called `test`
pub fn single(doc: &str) -> Registry {
    Registry::new(MemorySource::new().with("test", doc)).unwrap()
}

/// Event log written by a listener
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    /// Subscribe a recording listener to `cursor`
    pub fn attach<D: ActionDispatcher>(cursor: &mut Cursor<D>) -> Self {
        let log = Self::default();
        cursor.subscribe(log.listener());
        log
    }

    /// Listener closure that records into this log
    pub fn listener(&self) -> impl FnMut(&DialogueEvent<'_>) + Send + 'static {
        let sink = self.clone();
        move |event| sink.push(describe(event))
    }

    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    /// Take everything recorded so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Compact text form of an event, e.g. `node npc 10:1` or `action 13`
pub fn describe(event: &DialogueEvent<'_>) -> String {
    match event {
        DialogueEvent::ActionNode(id) => format!("action {id}"),
        DialogueEvent::NodeChange(step) => match step.kind {
            NodeKind::Npc => format!("node npc {}:{}", step.node_id, step.segment_index),
            NodeKind::Player => format!("node player {}", step.node_id),
            NodeKind::Action => format!("node action {}", step.node_id),
        },
        DialogueEvent::End(step) => format!("end {}", step.node_id),
        DialogueEvent::Loaded => "loaded".to_string(),
        DialogueEvent::Unloaded => "unloaded".to_string(),
    }
}
