//! CLI command: list discovered dialogues

use crate::config::ParleyConfig;

/// Print every dialogue in the configured directory with its tag and size
pub fn execute(config: &ParleyConfig, tag: Option<&str>) -> anyhow::Result<()> {
    let mut registry = config.open_registry()?;

    let names: Vec<String> = registry
        .entries()
        .iter()
        .filter(|e| tag.is_none_or(|t| e.load_tag() == t))
        .map(|e| e.name().to_string())
        .collect();

    if names.is_empty() {
        println!("No dialogues found in {}", config.dialogue_dir.display());
        return Ok(());
    }

    println!("{:<24} {:<16} {:>6}  STATUS", "NAME", "LOAD TAG", "NODES");
    for name in &names {
        let load_tag = registry
            .get(name)
            .map(|e| e.load_tag().to_string())
            .unwrap_or_default();
        match registry.load(name) {
            Ok(graph) => println!("{name:<24} {load_tag:<16} {:>6}  ok", graph.node_count()),
            Err(e) => println!("{name:<24} {load_tag:<16} {:>6}  error: {e}", "-"),
        }
    }
    println!("\n{} dialogue(s)", names.len());

    Ok(())
}
