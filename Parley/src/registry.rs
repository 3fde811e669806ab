//! Dialogue registry
//!
//! The registry knows every dialogue its [`DialogueSource`] offers. Entries
//! are discovered up front and loaded lazily: [`Registry::load`] builds a
//! graph the first time a conversation needs it, while
//! [`Registry::load_all`] and [`Registry::load_selective`] let the host load
//! ahead of time. Loaded graphs are shared as `Arc<Graph>`, so unloading
//! never pulls a graph out from under a running conversation.

use crate::error::{Error, Result};
use crate::events::{DialogueEvent, ListenerId, Listeners};
use parleygraph::formats::{parse_graph_document, peek_load_tag};
use parleygraph::graph::{Graph, build_graph};
use parleygraph::source::DialogueSource;
use std::fmt;
use std::sync::Arc;

/// One discovered dialogue
#[derive(Debug, Clone)]
pub struct DialogueEntry {
    name: String,
    load_tag: String,
    graph: Option<Arc<Graph>>,
}

impl DialogueEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load tag read at discovery; empty when the document has none
    #[must_use]
    pub fn load_tag(&self) -> &str {
        &self.load_tag
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    /// The loaded graph, if any
    #[must_use]
    pub fn graph(&self) -> Option<&Arc<Graph>> {
        self.graph.as_ref()
    }
}

/// The set of named dialogues known to the host
pub struct Registry {
    source: Box<dyn DialogueSource>,
    entries: Vec<DialogueEntry>,
    listeners: Listeners,
}

impl Registry {
    /// Create a registry and discover every dialogue in `source`
    ///
    /// # Errors
    /// Returns an error if the source cannot be enumerated.
    pub fn new(source: impl DialogueSource + 'static) -> Result<Self> {
        let mut registry = Self {
            source: Box::new(source),
            entries: Vec::new(),
            listeners: Listeners::new(),
        };
        registry.discover()?;
        Ok(registry)
    }

    /// Re-scan the source. Graphs already loaded stay loaded if their
    /// dialogue is still present.
    ///
    /// Every document the source lists is registered. Only its load tag is
    /// read here; content errors surface when the dialogue is loaded. A
    /// document whose tag cannot be read is registered untagged.
    ///
    /// Returns the number of discovered dialogues.
    ///
    /// # Errors
    /// Returns an error if the source cannot be enumerated.
    pub fn discover(&mut self) -> Result<usize> {
        let mut entries = Vec::new();
        for name in self.source.names()? {
            let load_tag = match self
                .source
                .read(&name)
                .and_then(|content| peek_load_tag(&content))
            {
                Ok(tag) => tag,
                Err(e) => {
                    tracing::warn!("No load tag for dialogue '{}': {}", name, e);
                    String::new()
                }
            };
            let graph = self.get(&name).and_then(|e| e.graph.clone());
            entries.push(DialogueEntry {
                name,
                load_tag,
                graph,
            });
        }
        self.entries = entries;
        tracing::info!("Discovered {} dialogue(s)", self.entries.len());
        Ok(self.entries.len())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Read and build one entry, replacing whatever was loaded before. On
    /// failure the entry is left unloaded.
    fn load_entry(&mut self, index: usize) -> Result<Arc<Graph>> {
        let entry = &mut self.entries[index];
        entry.graph = None;

        let doc = parse_graph_document(&self.source.read(&entry.name)?)?;
        let graph = Arc::new(build_graph(&doc)?);
        entry.load_tag = doc.load_tag;
        entry.graph = Some(Arc::clone(&graph));
        tracing::info!("Loaded dialogue '{}' ({} nodes)", entry.name, graph.node_count());
        Ok(graph)
    }

    /// Get the graph for `name`, loading it first if needed
    ///
    /// # Errors
    /// Returns [`Error::UnknownDialogue`] if no such dialogue is registered,
    /// or the load error. A failed load leaves the entry unloaded.
    pub fn load(&mut self, name: &str) -> Result<Arc<Graph>> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::UnknownDialogue(name.to_string()))?;
        match &self.entries[index].graph {
            Some(graph) => Ok(Arc::clone(graph)),
            None => self.load_entry(index),
        }
    }

    /// Load every registered dialogue. Failures are logged and skipped.
    ///
    /// Returns the number of dialogues loaded.
    pub fn load_all(&mut self) -> usize {
        let mut loaded = 0;
        for index in 0..self.entries.len() {
            match self.load_entry(index) {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!("Failed to load '{}': {}", self.entries[index].name, e),
            }
        }
        self.listeners.emit(&DialogueEvent::Loaded);
        loaded
    }

    /// Load dialogues by name, by load tag, or by both
    ///
    /// - tag only: every dialogue carrying the tag
    /// - name only: the dialogue with that name
    /// - both: the first dialogue with the tag and that name
    ///
    /// Empty strings count as absent.
    ///
    /// Returns the number of dialogues loaded.
    ///
    /// # Errors
    /// Returns [`Error::NothingMatched`] if no dialogue matched, or the first
    /// load error. No `Loaded` event is raised on failure.
    pub fn load_selective(&mut self, name: Option<&str>, tag: Option<&str>) -> Result<usize> {
        let name = name.filter(|n| !n.is_empty());
        let tag = tag.filter(|t| !t.is_empty());

        let matches: Vec<usize> = match (name, tag) {
            (None, None) => Vec::new(),
            (Some(name), None) => self.position(name).into_iter().collect(),
            (name, Some(tag)) => {
                let tagged = self
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.load_tag == tag)
                    .map(|(i, _)| i);
                match name {
                    Some(name) => tagged
                        .filter(|i| self.entries[*i].name == name)
                        .take(1)
                        .collect(),
                    None => tagged.collect(),
                }
            }
        };

        if matches.is_empty() {
            let what = match (name, tag) {
                (Some(n), Some(t)) => format!("name '{n}' with tag '{t}'"),
                (Some(n), None) => format!("name '{n}'"),
                (None, Some(t)) => format!("tag '{t}'"),
                (None, None) => "an empty request".to_string(),
            };
            return Err(Error::NothingMatched(what));
        }

        for &index in &matches {
            self.load_entry(index)?;
        }
        self.listeners.emit(&DialogueEvent::Loaded);
        Ok(matches.len())
    }

    /// Drop every loaded graph. Entries stay registered and can be loaded
    /// again.
    pub fn unload_all(&mut self) {
        for entry in &mut self.entries {
            entry.graph = None;
        }
        tracing::info!("Unloaded all dialogues");
        self.listeners.emit(&DialogueEvent::Unloaded);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DialogueEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The loaded graph for `name`, without loading it
    #[must_use]
    pub fn graph(&self, name: &str) -> Option<Arc<Graph>> {
        self.get(name).and_then(|e| e.graph.clone())
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.get(name).is_some_and(DialogueEntry::is_loaded)
    }

    /// Discovered entries, in name order
    #[must_use]
    pub fn entries(&self) -> &[DialogueEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_loaded()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a listener for `Loaded` and `Unloaded` events
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&DialogueEvent<'_>) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parleygraph::source::MemorySource;

    fn doc(tag: &str) -> String {
        format!(
            r#"{{"start_point": 0, "load_tag": "{tag}", "player_sets": [],
                 "npc_lines": [{{"id": 0, "text": "Hi"}}]}}"#
        )
    }

    fn registry() -> Registry {
        let source = MemorySource::new()
            .with("bandit", doc("Forest"))
            .with("guard", doc("Town"))
            .with("broken", "not json")
            .with("merchant", doc("Town"));
        Registry::new(source).unwrap()
    }

    #[test]
    fn test_discovery_registers_every_document() {
        let mut registry = registry();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["bandit", "broken", "guard", "merchant"]
        );
        assert_eq!(registry.get("guard").unwrap().load_tag(), "Town");
        assert_eq!(registry.get("broken").unwrap().load_tag(), "");
        assert_eq!(registry.loaded_count(), 0);

        // The decode error shows up when loading, not as a missing name
        assert!(matches!(
            registry.load("broken"),
            Err(Error::Graph(parleygraph::Error::JsonError(_)))
        ));
        assert!(!registry.is_loaded("broken"));
    }

    #[test]
    fn test_lazy_load() {
        let mut registry = registry();
        let graph = registry.load("guard").unwrap();
        assert_eq!(graph.npc_lines.len(), 1);
        assert!(registry.is_loaded("guard"));
        assert!(!registry.is_loaded("merchant"));
        assert!(Arc::ptr_eq(&graph, &registry.load("guard").unwrap()));
        assert!(matches!(registry.load("nobody"), Err(Error::UnknownDialogue(_))));
    }

    #[test]
    fn test_load_selective() {
        let mut registry = registry();
        assert_eq!(registry.load_selective(None, Some("Town")).unwrap(), 2);
        assert!(registry.is_loaded("merchant"));
        assert!(!registry.is_loaded("bandit"));

        registry.unload_all();
        assert_eq!(registry.load_selective(Some("merchant"), Some("Town")).unwrap(), 1);
        assert!(!registry.is_loaded("guard"));

        assert_eq!(registry.load_selective(Some("bandit"), Some("")).unwrap(), 1);
        assert!(matches!(
            registry.load_selective(Some("bandit"), Some("Town")),
            Err(Error::NothingMatched(_))
        ));
        assert!(matches!(registry.load_selective(None, None), Err(Error::NothingMatched(_))));
    }
}
