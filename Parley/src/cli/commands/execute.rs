//! Command execution implementations

use super::Commands;
use super::{convert, list, play, show, validate};
use crate::config::ParleyConfig;

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, config: &ParleyConfig) -> anyhow::Result<()> {
        match self {
            Commands::List { tag } => list::execute(config, tag.as_deref()),
            Commands::Show { name } => show::execute(config, name),
            Commands::Validate { name, quiet } => validate::execute(config, name.as_deref(), *quiet),
            Commands::Play {
                name,
                choices,
                start,
            } => play::execute(config, name, choices, *start),
            Commands::Convert {
                source,
                destination,
                to,
            } => convert::execute(source, destination, to.0),
        }
    }
}
