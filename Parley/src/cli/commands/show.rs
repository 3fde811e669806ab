//! CLI command: print a dialogue outline

use crate::config::ParleyConfig;
use parleygraph::export::generate_outline;

pub fn execute(config: &ParleyConfig, name: &str) -> anyhow::Result<()> {
    let mut registry = config.open_registry()?;
    let graph = registry.load(name)?;
    print!("{}", generate_outline(name, &graph));
    Ok(())
}
