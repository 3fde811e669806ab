mod common;

use common::{EventLog, fixture_registry, single};
use parley::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

/// Walk the guard's greeting up to the choice prompt
fn to_guard_choice<D: ActionDispatcher>(cursor: &mut Cursor<D>, registry: &mut Registry) {
    let first = cursor.begin(registry, &DialogueRef::new("guard")).unwrap();
    assert_eq!(first.current_segment(), Some("Halt!"));
    let second = cursor.next().unwrap();
    assert_eq!(second.current_segment(), Some("Who goes there?"));
    let prompt = cursor.next().unwrap();
    assert!(prompt.is_player());
}

#[test]
fn test_segments_then_end() {
    let mut registry = single(
        r#"{"start_point": 0, "player_sets": [],
            "npc_lines": [{"id": 0, "text": "Hello<br>World"}]}"#,
    );
    let mut cursor = Cursor::new();

    let step = cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    assert_eq!(step.segments, vec!["Hello", "World"]);
    assert_eq!(step.segment_index, 0);
    assert!(!step.is_end);

    let step = cursor.next().unwrap();
    assert_eq!(step.segment_index, 1);
    assert_eq!(step.current_segment(), Some("World"));
    assert!(!step.is_end);

    let step = cursor.next().unwrap();
    assert!(step.is_end);
    assert_eq!(step.node_id, 0);

    // Stays ended until closed
    assert!(cursor.next().unwrap().is_end);
}

#[test]
fn test_choice_without_exits_ends() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    to_guard_choice(&mut cursor, &mut registry);

    cursor.select_option(1).unwrap();
    let step = cursor.next().unwrap();
    assert!(step.is_end);
    assert_eq!(step.node_id, 11);
    assert_eq!(step.selected_option, 1);
}

#[test]
fn test_choice_with_answer_advances() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    to_guard_choice(&mut cursor, &mut registry);

    cursor.select_option(0).unwrap();
    let step = cursor.next().unwrap();
    assert!(!step.is_end);
    assert_eq!(step.kind, NodeKind::Npc);
    assert_eq!(step.node_id, 12);
    assert_eq!(step.tag, "Guard");
}

#[test]
fn test_event_order() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    let events = EventLog::attach(&mut cursor);

    to_guard_choice(&mut cursor, &mut registry);
    cursor.select_option(0).unwrap();
    cursor.next().unwrap();

    // The guard's last line runs a non-pausing action with no exits: one
    // call raises the action and the end.
    let step = cursor.next().unwrap();
    assert!(step.is_end);

    assert_eq!(
        events.take(),
        vec![
            "node npc 10:0",
            "node npc 10:1",
            "node player 11",
            "node npc 12:0",
            "action 13",
            "end 12",
        ]
    );
}

#[test]
fn test_non_pausing_action_dispatches_and_continues() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::with_dispatcher(ActionLog::new());
    let events = EventLog::attach(&mut cursor);

    let step = cursor.begin(&mut registry, &DialogueRef::new("merchant")).unwrap();
    assert_eq!(step.extra_data, "greeting");
    cursor.next().unwrap();
    let prompt = cursor.next().unwrap();
    assert_eq!(prompt.choices, vec!["Buy a potion", "Just looking", "Goodbye"]);
    assert_eq!(prompt.choice_extra_data, vec!["shop", "", ""]);
    events.take();

    cursor.select_option(0).unwrap();
    let step = cursor.next().unwrap();
    assert!(!step.paused_action);
    assert_eq!(step.kind, NodeKind::Npc);
    assert_eq!(step.node_id, 4);
    assert_eq!(step.current_segment(), Some("Here you go."));

    assert_eq!(events.take(), vec!["action 3", "node npc 4:0"]);
    assert_eq!(
        cursor.dispatcher().calls(),
        &[DispatchedCall {
            object: "Inventory".to_string(),
            method: "GiveItem".to_string(),
            param: ActionParam::Str("Potion".to_string()),
        }]
    );
}

#[test]
fn test_pausing_action_holds_until_resumed() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::with_dispatcher(ActionLog::new());
    let merchant = DialogueRef::new("merchant");

    cursor.begin(&mut registry, &merchant).unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    cursor.select_option(0).unwrap();
    cursor.next().unwrap();
    let events = EventLog::attach(&mut cursor);

    // "Here you go." hands over to the door action, which pauses
    let step = cursor.next().unwrap();
    assert!(step.paused_action);
    assert!(!step.is_end);
    assert_eq!(step.node_id, 4);
    assert_eq!(events.take(), vec!["action 5"]);

    assert!(matches!(cursor.next(), Err(Error::ActionPaused(5))));
    assert_eq!(cursor.dispatcher().len(), 2);

    cursor.resume().unwrap();
    let step = cursor.next().unwrap();
    assert!(step.is_end);
    assert_eq!(events.take(), vec!["end 4"]);
}

#[test]
fn test_action_applies_override_and_rename() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    let merchant = DialogueRef::new("merchant");

    cursor.begin(&mut registry, &merchant).unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    cursor.select_option(0).unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    cursor.resume().unwrap();
    assert!(cursor.next().unwrap().is_end);
    cursor.end_dialogue();

    assert_eq!(merchant.display_name(), "Friendly Merchant");
    assert_eq!(merchant.override_start(), Some(4));
    assert_eq!(merchant.interaction_count(), 1);

    // The override is used once, then the graph's own start applies again
    let step = cursor.begin(&mut registry, &merchant).unwrap();
    assert_eq!(step.node_id, 4);
    assert_eq!(cursor.start_node(), Some(4));
    assert_eq!(merchant.override_start(), None);
    cursor.end_dialogue();

    let step = cursor.begin(&mut registry, &merchant).unwrap();
    assert_eq!(step.node_id, 0);
    cursor.end_dialogue();
    assert_eq!(merchant.interaction_count(), 3);
}

#[test]
fn test_restart_is_idempotent() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    let guard = DialogueRef::new("guard");

    let first = cursor.begin(&mut registry, &guard).unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    cursor.end_dialogue();
    assert!(!cursor.is_active());

    let again = cursor.begin(&mut registry, &guard).unwrap();
    assert_eq!(again, first);
    assert_eq!(cursor.current(), Some(&first));
}

#[test]
fn test_jump_holds_one_step_on_dead_end() {
    let mut registry = single(
        r#"{"start_point": 0,
            "player_sets": [{"id": 2, "choices": [{"text": "Bye"}]}],
            "npc_lines": [
                {"id": 0, "text": "Start", "next_line": 1},
                {"id": 1, "text": "Dead end"}
            ]}"#,
    );
    let mut cursor = Cursor::new();
    cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    let events = EventLog::attach(&mut cursor);

    let step = cursor.set_node(1).unwrap();
    assert_eq!(step.node_id, 1);
    assert!(!step.is_end);

    // The end-of-line check is skipped once...
    let held = cursor.next().unwrap();
    assert!(!held.is_end);
    assert_eq!(held.node_id, 1);

    // ...and only once
    let step = cursor.next().unwrap();
    assert!(step.is_end);
    assert_eq!(events.take(), vec!["node npc 1:0", "node npc 1:0", "end 1"]);
}

#[test]
fn test_jump_searches_player_sets_first() {
    let mut registry = single(
        r#"{"start_point": 5,
            "player_sets": [{"id": 5, "choices": [{"text": "Ask again", "answer": 0}]}],
            "npc_lines": [{"id": 5, "text": "Shared id"}]}"#,
    );
    let mut cursor = Cursor::new();

    // Starting looks at NPC lines first, jumping at player sets first
    let step = cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    assert_eq!(step.kind, NodeKind::Npc);
    let step = cursor.set_node(5).unwrap();
    assert_eq!(step.kind, NodeKind::Player);
    assert_eq!(step.choices, vec!["Ask again"]);
}

#[test]
fn test_jump_to_action_runs_it() {
    let mut registry = single(
        r#"{"start_point": 0,
            "player_sets": [],
            "npc_lines": [
                {"id": 0, "text": "Waiting"},
                {"id": 1, "text": "Done"}
            ],
            "actions": [{"id": 9, "target": "Bell", "method": "Ring",
                         "param_kind": "int", "param_int": 3, "next_line": 1}]}"#,
    );
    let rung = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&rung);
    let mut table = ObjectTable::new();
    table.register("Bell", move |method: &str, param: &ActionParam| {
        sink.lock().unwrap().push(format!("{method}({param})"));
    });
    let mut cursor = Cursor::with_dispatcher(table);

    cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    let step = cursor.set_node(9).unwrap();
    assert_eq!(step.kind, NodeKind::Npc);
    assert_eq!(step.node_id, 1);
    assert_eq!(*rung.lock().unwrap(), vec!["Ring(3)"]);
}

#[test]
fn test_start_on_action() {
    let mut registry = single(
        r#"{"start_point": 3,
            "player_sets": [],
            "npc_lines": [{"id": 0, "text": "After the action"}],
            "actions": [{"id": 3, "target": "Lamp", "method": "Light", "pause_here": true,
                         "next_line": 0}]}"#,
    );
    let mut cursor = Cursor::new();
    let events = EventLog::attach(&mut cursor);

    let step = cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    assert_eq!(step.kind, NodeKind::Action);
    assert_eq!(step.node_id, 3);
    assert!(step.paused_action);

    cursor.resume().unwrap();
    let step = cursor.next().unwrap();
    assert_eq!(step.current_segment(), Some("After the action"));
    assert_eq!(events.take(), vec!["action 3", "node npc 0:0"]);
}

#[test]
fn test_start_on_non_pausing_action() {
    let mut registry = single(
        r#"{"start_point": 3,
            "player_sets": [],
            "npc_lines": [{"id": 0, "text": "After the action"}],
            "actions": [{"id": 3, "target": "Lamp", "method": "Light", "next_line": 0}]}"#,
    );
    let mut cursor = Cursor::with_dispatcher(ActionLog::new());
    let events = EventLog::attach(&mut cursor);

    // One begin call runs the action and lands on its target
    let step = cursor.begin(&mut registry, &DialogueRef::new("test")).unwrap();
    assert_eq!(step.kind, NodeKind::Npc);
    assert_eq!(step.node_id, 0);
    assert!(!step.paused_action);
    assert_eq!(step.current_segment(), Some("After the action"));
    assert_eq!(events.take(), vec!["action 3", "node npc 0:0"]);
    assert_eq!(cursor.dispatcher().len(), 1);
}

#[test]
fn test_end_dialogue_without_conversation_is_harmless() {
    let mut cursor = Cursor::new();
    cursor.end_dialogue();
    assert!(!cursor.is_active());
    assert!(matches!(cursor.resume(), Err(Error::NoActiveConversation)));
}

#[test]
fn test_conversation_survives_unload() {
    let mut registry = fixture_registry();
    let mut cursor = Cursor::new();
    let guard = DialogueRef::new("guard");

    cursor.begin(&mut registry, &guard).unwrap();
    registry.unload_all();
    assert!(!registry.is_loaded("guard"));

    let step = cursor.next().unwrap();
    assert_eq!(step.segment_index, 1);
    assert_eq!(cursor.dialogue_name(), Some("guard"));
}
