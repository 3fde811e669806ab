//! Action dispatch
//!
//! When the engine runs an action node it hands the target object name,
//! method name and parameter to an [`ActionDispatcher`] supplied by the host.
//! Dispatch is fire-and-forget: nothing is returned, and a target with no
//! receivers is not an error.

use indexmap::IndexMap;
use parleygraph::graph::ActionParam;
use std::fmt;

/// Host-side hook that carries out action calls
pub trait ActionDispatcher {
    /// Invoke `method` with `param` on every object named `object`
    fn dispatch(&mut self, object: &str, method: &str, param: &ActionParam);
}

impl<F> ActionDispatcher for F
where
    F: FnMut(&str, &str, &ActionParam),
{
    fn dispatch(&mut self, object: &str, method: &str, param: &ActionParam) {
        self(object, method, param);
    }
}

/// Dispatcher that drops every call
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

impl ActionDispatcher for NullDispatcher {
    fn dispatch(&mut self, object: &str, method: &str, _param: &ActionParam) {
        tracing::debug!("No dispatcher for {}.{}", object, method);
    }
}

/// One object able to receive action calls
pub trait ActionReceiver: Send {
    fn receive(&mut self, method: &str, param: &ActionParam);
}

impl<F> ActionReceiver for F
where
    F: FnMut(&str, &ActionParam) + Send,
{
    fn receive(&mut self, method: &str, param: &ActionParam) {
        self(method, param);
    }
}

/// Named receivers, with broadcast to every receiver sharing a name
#[derive(Default)]
pub struct ObjectTable {
    objects: IndexMap<String, Vec<Box<dyn ActionReceiver>>>,
}

impl ObjectTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a receiver under `name`. Several receivers may share one name.
    pub fn register(&mut self, name: impl Into<String>, receiver: impl ActionReceiver + 'static) {
        self.objects
            .entry(name.into())
            .or_default()
            .push(Box::new(receiver));
    }

    /// Drop every receiver registered under `name`, returning how many there were
    pub fn remove(&mut self, name: &str) -> usize {
        self.objects.shift_remove(name).map_or(0, |r| r.len())
    }

    /// Number of receivers registered under `name`
    #[must_use]
    pub fn receivers(&self, name: &str) -> usize {
        self.objects.get(name).map_or(0, Vec::len)
    }

    /// Number of distinct object names
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ActionDispatcher for ObjectTable {
    fn dispatch(&mut self, object: &str, method: &str, param: &ActionParam) {
        let Some(receivers) = self.objects.get_mut(object) else {
            tracing::debug!("No receivers named '{}' for {}", object, method);
            return;
        };
        for receiver in receivers {
            receiver.receive(method, param);
        }
    }
}

impl fmt::Debug for ObjectTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.objects.iter().map(|(name, r)| (name, r.len())))
            .finish()
    }
}

/// A recorded action call
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedCall {
    pub object: String,
    pub method: String,
    pub param: ActionParam,
}

/// Dispatcher that records every call in order
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    calls: Vec<DispatchedCall>,
}

impl ActionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[DispatchedCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty
    pub fn drain(&mut self) -> Vec<DispatchedCall> {
        std::mem::take(&mut self.calls)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl ActionDispatcher for ActionLog {
    fn dispatch(&mut self, object: &str, method: &str, param: &ActionParam) {
        self.calls.push(DispatchedCall {
            object: object.to_string(),
            method: method.to_string(),
            param: param.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_object_table_broadcasts() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut table = ObjectTable::new();
        for label in ["left", "right"] {
            let hits = Arc::clone(&hits);
            table.register("Door", move |method: &str, param: &ActionParam| {
                hits.lock().unwrap().push(format!("{label}:{method}:{param:?}"));
            });
        }
        assert_eq!(table.receivers("Door"), 2);

        table.dispatch("Door", "Open", &ActionParam::Bool(true));
        table.dispatch("Window", "Open", &ActionParam::None);

        assert_eq!(
            *hits.lock().unwrap(),
            vec!["left:Open:Bool(true)", "right:Open:Bool(true)"]
        );
        assert_eq!(table.remove("Door"), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_action_log_and_closure() {
        let mut log = ActionLog::new();
        log.dispatch("Inventory", "Give", &ActionParam::Str("Potion".into()));
        assert_eq!(log.len(), 1);
        assert_eq!(log.calls()[0].method, "Give");
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());

        let mut count = 0;
        let mut counter = |_: &str, _: &str, _: &ActionParam| count += 1;
        counter.dispatch("A", "B", &ActionParam::Int(1));
        assert_eq!(count, 1);
    }
}
