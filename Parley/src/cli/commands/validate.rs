//! CLI command: validate dialogue graphs

use crate::config::ParleyConfig;
use parleygraph::validate::validate_graph;

/// Validate one dialogue, or every dialogue when `name` is `None`
///
/// Fails if any dialogue cannot be loaded or has structural errors.
pub fn execute(config: &ParleyConfig, name: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    let mut registry = config.open_registry()?;
    let names: Vec<String> = match name {
        Some(name) => vec![name.to_string()],
        None => registry.names().map(str::to_string).collect(),
    };

    let mut failed = 0;
    for name in &names {
        let graph = match registry.load(name) {
            Ok(graph) => graph,
            Err(e) => {
                println!("x {name}: {e}");
                failed += 1;
                continue;
            }
        };

        let result = validate_graph(&graph);
        if result.valid {
            println!("+ {name}");
        } else {
            println!("x {name}");
            failed += 1;
        }
        for error in &result.errors {
            println!("    error: {error}");
        }
        if !quiet {
            for warning in &result.warnings {
                println!("    warning: {warning}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} dialogue(s) failed validation", names.len());
    }
    println!("\nAll {} dialogue(s) valid", names.len());
    Ok(())
}
