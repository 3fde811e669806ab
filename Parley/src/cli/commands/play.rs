//! CLI command: play a conversation in the terminal

use crate::assign::DialogueRef;
use crate::config::ParleyConfig;
use crate::engine::{Cursor, NodeKind, StepResult};
use crate::events::DialogueEvent;
use anyhow::Context;
use parleygraph::graph::ActionParam;
use std::io::{self, BufRead, Write};

fn render(step: &StepResult) {
    match step.kind {
        NodeKind::Npc => {
            let speaker = if step.tag.is_empty() { "NPC" } else { step.tag.as_str() };
            println!("{speaker}: {}", step.current_segment().unwrap_or(""));
        }
        NodeKind::Player => {
            if !step.player_tag.is_empty() {
                println!("[{}]", step.player_tag);
            }
            for (i, choice) in step.choices.iter().enumerate() {
                println!("  {i}) {choice}");
            }
        }
        NodeKind::Action => {}
    }
}

/// Read a choice index from `input`; `None` at end of input
fn prompt(input: &mut impl BufRead, count: usize) -> anyhow::Result<Option<usize>> {
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(choice) if choice < count => return Ok(Some(choice)),
            _ => println!("Enter a number from 0 to {}", count.saturating_sub(1)),
        }
    }
}

/// Play `name` from its start point (or `start`), taking `choices` in order
/// and then asking on stdin
pub fn execute(
    config: &ParleyConfig,
    name: &str,
    choices: &[usize],
    start: Option<i32>,
) -> anyhow::Result<()> {
    let mut registry = config.open_registry()?;
    let dialogue = DialogueRef::new(name);
    if start.is_some() {
        dialogue.set_override_start(start);
    }

    let mut cursor = Cursor::with_dispatcher(|object: &str, method: &str, param: &ActionParam| {
        println!("  >> {object}.{method}({param})");
    });
    cursor.subscribe(|event| match event {
        DialogueEvent::NodeChange(step) => render(step),
        DialogueEvent::ActionNode(id) => println!("  [action {id}]"),
        DialogueEvent::End(_) => println!("[END]"),
        DialogueEvent::Loaded | DialogueEvent::Unloaded => {}
    });

    let mut scripted = choices.iter().copied();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut step = cursor
        .begin(&mut registry, &dialogue)
        .with_context(|| format!("Failed to begin '{name}'"))?;
    let mut steps = 0;
    while !step.is_end {
        if step.paused_action {
            println!("  (paused, resuming)");
            cursor.resume()?;
        } else if step.is_player() && !step.choices.is_empty() {
            let choice = match scripted.next() {
                Some(choice) => choice,
                None => match prompt(&mut input, step.choices.len())? {
                    Some(choice) => choice,
                    None => anyhow::bail!("Input ended before the conversation did"),
                },
            };
            println!("  -> {}", step.choices.get(choice).map_or("?", String::as_str));
            cursor.select_option(choice)?;
        }
        step = cursor.next()?;
        steps += 1;
    }

    let display_name = dialogue.display_name();
    cursor.end_dialogue();
    tracing::info!("Finished '{}' in {} step(s)", display_name, steps);
    if display_name != name {
        println!("({name} is now known as {display_name})");
    }
    if let Some(next) = dialogue.override_start() {
        println!("(next conversation starts at node {next})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as Input;

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut input = Input::new("x\n9\n1\n");
        assert_eq!(prompt(&mut input, 2).unwrap(), Some(1));
        let mut empty = Input::new("");
        assert_eq!(prompt(&mut empty, 2).unwrap(), None);
    }
}
