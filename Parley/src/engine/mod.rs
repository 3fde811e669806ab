//! Traversal engine
//!
//! A [`Cursor`] walks one conversation at a time. The host drives it:
//! [`Cursor::begin`] positions it on the start node, every [`Cursor::next`]
//! moves one step, and [`Cursor::end_dialogue`] resets it. Each step hands
//! back a [`StepResult`] and raises events on the cursor's listeners.
//!
//! # Step order
//!
//! `next()` checks, in this order:
//! 1. an NPC line on its last segment with no exits ends the conversation
//!    (skipped once after a jump);
//! 2. a selected choice with no answer and no action ends it;
//! 3. a finished action with no exits ends it;
//! 4. a pending action (from the choice, the NPC line's last segment, or the
//!    previous action's chain) runs before anything else;
//! 5. an NPC line with segments left advances to the next segment;
//! 6. otherwise links are followed: the last action's NPC link, then its
//!    player link, then the current node's own continuation.
//!
//! Actions that do not pause continue straight into the next step within the
//! same call.

mod step;

pub use step::{NodeKind, StepResult};

use crate::assign::DialogueRef;
use crate::dispatch::{ActionDispatcher, NullDispatcher};
use crate::error::{Error, Result};
use crate::events::{DialogueEvent, ListenerId, Listeners};
use crate::registry::Registry;
use parleygraph::graph::{ActionId, Graph, NodeRef, NpcLineId, PlayerSetId};
use std::fmt;
use std::sync::Arc;

/// Outcome of one pass of the step algorithm
enum Advance {
    /// The step is complete
    Step(StepResult),
    /// This action must run next
    Action(ActionId),
}

/// State of the running conversation
struct Conversation {
    name: String,
    graph: Arc<Graph>,
    dialogue: DialogueRef,
    start: i32,
    current_player: Option<PlayerSetId>,
    current_npc: Option<NpcLineId>,
    pending_action: Option<ActionId>,
    last_action: Option<ActionId>,
    jumped: bool,
    step: StepResult,
}

impl Conversation {
    fn end(&mut self, listeners: &mut Listeners) -> StepResult {
        self.step.is_end = true;
        tracing::debug!("Conversation '{}' ended at node {}", self.name, self.step.node_id);
        listeners.emit(&DialogueEvent::End(&self.step));
        self.step.clone()
    }

    fn show(&mut self, step: StepResult, listeners: &mut Listeners) -> StepResult {
        tracing::debug!("'{}': {:?} node {}", self.name, step.kind, step.node_id);
        self.step = step;
        self.last_action = None;
        listeners.emit(&DialogueEvent::NodeChange(&self.step));
        self.step.clone()
    }

    fn enter_player(&mut self, id: PlayerSetId, listeners: &mut Listeners) -> StepResult {
        self.current_player = Some(id);
        let step = StepResult::player(self.graph.player(id));
        self.show(step, listeners)
    }

    fn enter_npc(&mut self, id: NpcLineId, listeners: &mut Listeners) -> StepResult {
        self.current_npc = Some(id);
        let step = StepResult::npc(self.graph.npc(id));
        self.show(step, listeners)
    }

    /// Position on `node`, dropping any action chain in progress. Text nodes
    /// are shown at once; an action is handed back to be run.
    fn enter(&mut self, node: NodeRef, listeners: &mut Listeners) -> Advance {
        self.pending_action = None;
        self.last_action = None;
        match node {
            NodeRef::Player(id) => Advance::Step(self.enter_player(id, listeners)),
            NodeRef::Npc(id) => Advance::Step(self.enter_npc(id, listeners)),
            NodeRef::Action(id) => {
                self.step = StepResult::action(self.graph.action(id));
                self.pending_action = Some(id);
                self.last_action = Some(id);
                Advance::Action(id)
            }
        }
    }

    /// Where plain link-following leads from here
    fn link_target(&self, option: usize) -> Option<NodeRef> {
        let graph = &self.graph;
        if let Some(last) = self.last_action {
            let action = graph.action(last);
            if let Some(line) = action.next_line {
                return Some(NodeRef::Npc(line));
            }
            if let Some(set) = action.next_set {
                return Some(NodeRef::Player(set));
            }
        }
        match self.step.kind {
            NodeKind::Npc => self.current_npc.and_then(|n| {
                let line = graph.npc(n);
                line.next_set
                    .map(NodeRef::Player)
                    .or(line.next_line.map(NodeRef::Npc))
            }),
            NodeKind::Player => self
                .current_player
                .and_then(|s| graph.player(s).choices.get(option))
                .and_then(|c| c.answer)
                .map(NodeRef::Npc),
            NodeKind::Action => None,
        }
    }

    /// One pass of the step algorithm
    fn advance(&mut self, listeners: &mut Listeners) -> Result<Advance> {
        let graph = Arc::clone(&self.graph);
        let option = self.step.selected_option;
        let jumped = self.jumped;

        if !jumped
            && self.step.kind == NodeKind::Npc
            && let Some(npc) = self.current_npc
            && !graph.npc(npc).has_exits()
            && self.step.is_final_segment()
        {
            return Ok(Advance::Step(self.end(listeners)));
        }

        if self.step.kind == NodeKind::Player
            && let Some(set) = self.current_player
        {
            let choices = &graph.player(set).choices;
            match choices.get(option) {
                Some(choice) if choice.has_exits() => {}
                None if !choices.is_empty() => {
                    return Err(Error::InvalidOption {
                        index: option,
                        count: choices.len(),
                    });
                }
                _ => return Ok(Advance::Step(self.end(listeners))),
            }
        }

        if let Some(last) = self.last_action
            && !graph.action(last).has_exits()
        {
            return Ok(Advance::Step(self.end(listeners)));
        }

        self.jumped = false;

        let next_action = match self.pending_action {
            Some(pending) => graph.action(pending).next_action,
            None => match self.step.kind {
                NodeKind::Player => self
                    .current_player
                    .and_then(|s| graph.player(s).choices.get(option))
                    .and_then(|c| c.action),
                NodeKind::Npc if self.step.is_final_segment() => {
                    self.current_npc.and_then(|n| graph.npc(n).action)
                }
                _ => None,
            },
        };
        self.pending_action = next_action;
        if let Some(action) = next_action {
            self.last_action = Some(action);
            return Ok(Advance::Action(action));
        }

        if self.step.kind == NodeKind::Npc && !self.step.is_final_segment() {
            self.step.segment_index += 1;
            self.last_action = None;
            listeners.emit(&DialogueEvent::NodeChange(&self.step));
            return Ok(Advance::Step(self.step.clone()));
        }

        match self.link_target(option) {
            Some(NodeRef::Player(id)) => Ok(Advance::Step(self.enter_player(id, listeners))),
            Some(NodeRef::Npc(id)) => Ok(Advance::Step(self.enter_npc(id, listeners))),
            // A jump landed on a node with nowhere to go: hold position for
            // this step, the next one ends the conversation.
            _ if jumped => {
                listeners.emit(&DialogueEvent::NodeChange(&self.step));
                Ok(Advance::Step(self.step.clone()))
            }
            _ => Ok(Advance::Step(self.end(listeners))),
        }
    }
}

/// Traversal position within one active conversation
///
/// `D` carries out action calls; see [`ActionDispatcher`].
pub struct Cursor<D: ActionDispatcher = NullDispatcher> {
    dispatcher: D,
    listeners: Listeners,
    conversation: Option<Conversation>,
}

impl Cursor<NullDispatcher> {
    /// Cursor whose actions only raise events
    #[must_use]
    pub fn new() -> Self {
        Self::with_dispatcher(NullDispatcher)
    }
}

impl Default for Cursor<NullDispatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ActionDispatcher> Cursor<D> {
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self {
            dispatcher,
            listeners: Listeners::new(),
            conversation: None,
        }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    /// Register a listener for `ActionNode`, `NodeChange` and `End` events
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&DialogueEvent<'_>) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Whether a conversation is running (including one that has ended but
    /// not been closed with [`end_dialogue`](Self::end_dialogue))
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.conversation.is_some()
    }

    /// The latest step
    #[must_use]
    pub fn current(&self) -> Option<&StepResult> {
        self.conversation.as_ref().map(|c| &c.step)
    }

    /// The latest step, for edits such as choosing an option or rewriting
    /// text before display
    pub fn step_mut(&mut self) -> Option<&mut StepResult> {
        self.conversation.as_mut().map(|c| &mut c.step)
    }

    /// Set the choice taken on the next step
    pub fn select_option(&mut self, index: usize) -> Result<()> {
        let conv = self.conversation.as_mut().ok_or(Error::NoActiveConversation)?;
        conv.step.selected_option = index;
        Ok(())
    }

    /// Clear the pause left by an action with "pause here"
    pub fn resume(&mut self) -> Result<()> {
        let conv = self.conversation.as_mut().ok_or(Error::NoActiveConversation)?;
        conv.step.paused_action = false;
        Ok(())
    }

    /// Effective start node of the running conversation
    #[must_use]
    pub fn start_node(&self) -> Option<i32> {
        self.conversation.as_ref().map(|c| c.start)
    }

    /// Registry name of the running dialogue
    #[must_use]
    pub fn dialogue_name(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.name.as_str())
    }

    /// The graph being walked
    #[must_use]
    pub fn graph(&self) -> Option<&Arc<Graph>> {
        self.conversation.as_ref().map(|c| &c.graph)
    }

    /// First non-empty tag among the player sets or NPC lines of the
    /// running dialogue
    pub fn first_tag(&self, kind: NodeKind) -> Result<Option<String>> {
        let conv = self.conversation.as_ref().ok_or(Error::NoActiveConversation)?;
        let tag = match kind {
            NodeKind::Player => conv.graph.first_player_tag(),
            NodeKind::Npc => conv.graph.first_npc_tag(),
            NodeKind::Action => None,
        };
        Ok(tag.map(str::to_string))
    }

    /// Start a conversation with `dialogue`
    ///
    /// Loads the dialogue if needed. The start node is the reference's
    /// override when one is set (it is consumed), otherwise the graph's own
    /// start. Starting on an action runs it immediately.
    ///
    /// # Errors
    /// - [`Error::ConversationActive`] if the previous conversation was not
    ///   closed with [`end_dialogue`](Self::end_dialogue)
    /// - [`Error::UnknownDialogue`] or a load error from the registry
    /// - [`Error::StartNodeNotFound`] if the start ID matches no node
    /// - [`Error::ActionChainCycle`] from a start action
    ///
    /// On error no conversation is left running and the override is kept.
    pub fn begin(&mut self, registry: &mut Registry, dialogue: &DialogueRef) -> Result<StepResult> {
        if self.conversation.is_some() {
            return Err(Error::ConversationActive);
        }

        let name = dialogue.dialogue();
        let graph = registry.load(&name)?;
        let start = dialogue.override_start().unwrap_or(graph.start);
        let node = graph.find_start(start).ok_or_else(|| Error::StartNodeNotFound {
            dialogue: name.clone(),
            id: start,
        })?;
        let taken = dialogue.take_override_start();
        tracing::debug!("Beginning '{}' at node {}", name, start);

        let conv = self.conversation.insert(Conversation {
            name,
            graph,
            dialogue: dialogue.clone(),
            start,
            current_player: None,
            current_npc: None,
            pending_action: None,
            last_action: None,
            jumped: false,
            step: StepResult::empty(NodeKind::Npc, start),
        });
        let first = conv.enter(node, &mut self.listeners);
        let result = self.proceed(first);
        if result.is_err() {
            self.conversation = None;
            dialogue.set_override_start(taken);
        }
        result
    }

    /// Move to the next step
    ///
    /// # Errors
    /// - [`Error::NoActiveConversation`] before [`begin`](Self::begin)
    /// - [`Error::ActionPaused`] while an action holds the conversation
    /// - [`Error::InvalidOption`] if `selected_option` is past the choices
    /// - [`Error::ActionChainCycle`] if actions chain forever without pausing
    pub fn next(&mut self) -> Result<StepResult> {
        let conv = self.conversation.as_mut().ok_or(Error::NoActiveConversation)?;
        if conv.step.paused_action {
            let id = conv
                .last_action
                .map_or(conv.step.node_id, |a| conv.graph.action(a).id);
            return Err(Error::ActionPaused(id));
        }
        let first = conv.advance(&mut self.listeners)?;
        self.proceed(first)
    }

    /// Jump straight to the node with `id`
    ///
    /// Player sets are searched first, then NPC lines, then actions. After a
    /// jump to a text node the next step skips the end-of-line check once.
    ///
    /// # Errors
    /// [`Error::NoActiveConversation`] or [`Error::NodeNotFound`]; the
    /// position is unchanged on error.
    pub fn set_node(&mut self, id: i32) -> Result<StepResult> {
        let conv = self.conversation.as_mut().ok_or(Error::NoActiveConversation)?;
        let node = conv.graph.find_node(id).ok_or(Error::NodeNotFound(id))?;
        tracing::debug!("Jumping to {} {}", node.kind_name(), id);
        let first = conv.enter(node, &mut self.listeners);
        conv.jumped = !matches!(node, NodeRef::Action(_));
        self.proceed(first)
    }

    /// Close the conversation and count the interaction on its reference
    pub fn end_dialogue(&mut self) {
        if let Some(conv) = self.conversation.take() {
            conv.dialogue.record_interaction();
            tracing::debug!("Closed conversation '{}'", conv.name);
        }
    }

    fn proceed(&mut self, first: Advance) -> Result<StepResult> {
        match first {
            Advance::Step(step) => Ok(step),
            Advance::Action(action) => self.run_actions(action),
        }
    }

    /// Run `action` and whatever non-pausing chain follows it
    fn run_actions(&mut self, mut action: ActionId) -> Result<StepResult> {
        let Self {
            dispatcher,
            listeners,
            conversation,
        } = self;
        let conv = conversation.as_mut().ok_or(Error::NoActiveConversation)?;
        let graph = Arc::clone(&conv.graph);
        let mut executed = 0;

        loop {
            let node = graph.action(action);
            executed += 1;
            if executed > graph.actions.len() {
                return Err(Error::ActionChainCycle(node.id));
            }

            tracing::debug!("Action {}: {}.{}", node.id, node.target, node.method);
            listeners.emit(&DialogueEvent::ActionNode(node.id));
            if let Some(start) = node.override_start {
                conv.dialogue.set_override_start(Some(start));
            }
            if let Some(name) = &node.rename {
                conv.dialogue.set_display_name(name.as_str());
            }
            dispatcher.dispatch(&node.target, &node.method, &node.param);

            if node.pause_here {
                conv.step.paused_action = true;
                return Ok(conv.step.clone());
            }
            match conv.advance(listeners)? {
                Advance::Step(step) => return Ok(step),
                Advance::Action(next) => action = next,
            }
        }
    }
}

impl<D: ActionDispatcher> fmt::Debug for Cursor<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("dialogue", &self.dialogue_name())
            .field("step", &self.current())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parleygraph::source::MemorySource;
    use pretty_assertions::assert_eq;

    fn registry(doc: &str) -> Registry {
        Registry::new(MemorySource::new().with("test", doc)).unwrap()
    }

    #[test]
    fn test_preconditions() {
        let mut cursor = Cursor::new();
        assert!(matches!(cursor.next(), Err(Error::NoActiveConversation)));
        assert!(matches!(cursor.set_node(0), Err(Error::NoActiveConversation)));
        assert!(matches!(cursor.first_tag(NodeKind::Npc), Err(Error::NoActiveConversation)));

        let mut registry = registry(
            r#"{"start_point": 0, "player_sets": [],
                "npc_lines": [{"id": 0, "text": "Hi", "tag": "Ann"}]}"#,
        );
        let dialogue = DialogueRef::new("test");
        cursor.begin(&mut registry, &dialogue).unwrap();
        assert!(matches!(
            cursor.begin(&mut registry, &dialogue),
            Err(Error::ConversationActive)
        ));
        assert_eq!(cursor.first_tag(NodeKind::Npc).unwrap().as_deref(), Some("Ann"));
        assert_eq!(cursor.first_tag(NodeKind::Player).unwrap(), None);
        assert!(matches!(cursor.set_node(99), Err(Error::NodeNotFound(99))));
    }

    #[test]
    fn test_missing_start_node() {
        let mut registry = registry(r#"{"start_point": 7, "player_sets": []}"#);
        let mut cursor = Cursor::new();
        let err = cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap_err();
        assert!(matches!(err, Error::StartNodeNotFound { id: 7, .. }));
        assert!(!cursor.is_active());
    }

    #[test]
    fn test_invalid_option() {
        let mut registry = registry(
            r#"{"start_point": 1, "player_sets": [{"id": 1, "choices": [{"text": "a", "answer": 0}]}],
                "npc_lines": [{"id": 0, "text": "Hi"}]}"#,
        );
        let mut cursor = Cursor::new();
        cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
        cursor.select_option(3).unwrap();
        assert!(matches!(
            cursor.next(),
            Err(Error::InvalidOption { index: 3, count: 1 })
        ));
        cursor.select_option(0).unwrap();
        assert_eq!(cursor.next().unwrap().node_id, 0);
    }

    #[test]
    fn test_action_cycle_is_reported() {
        let mut registry = registry(
            r#"{"start_point": 5, "player_sets": [],
                "actions": [{"id": 5, "target": "A", "method": "Loop", "next_action": 0}]}"#,
        );
        let mut cursor = Cursor::new();
        let dialogue = DialogueRef::new("test");
        let err = cursor.begin(&mut registry, &dialogue).unwrap_err();
        assert!(matches!(err, Error::ActionChainCycle(5)));

        // The failed begin leaves nothing running
        assert!(!cursor.is_active());
        cursor.end_dialogue();
        assert_eq!(dialogue.interaction_count(), 0);
        assert!(matches!(
            cursor.begin(&mut registry, &dialogue),
            Err(Error::ActionChainCycle(5))
        ));
    }

    #[test]
    fn test_failed_begin_keeps_override() {
        let mut registry = registry(
            r#"{"start_point": 0, "player_sets": [],
                "npc_lines": [{"id": 0, "text": "Hi"}],
                "actions": [{"id": 5, "target": "A", "method": "Loop", "next_action": 0}]}"#,
        );
        let mut cursor = Cursor::new();
        let dialogue = DialogueRef::new("test");
        dialogue.set_override_start(Some(5));
        assert!(cursor.begin(&mut registry, &dialogue).is_err());
        assert_eq!(dialogue.override_start(), Some(5));
        assert!(!cursor.is_active());
    }
}
