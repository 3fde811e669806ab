//! Runtime configuration (parley.toml)

use crate::error::Result;
use crate::registry::Registry;
use parleygraph::source::DirectorySource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the config directory
pub const CONFIG_FILE: &str = "parley.toml";

fn default_dialogue_dir() -> PathBuf {
    PathBuf::from("Dialogues")
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for discovering and loading dialogues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Directory scanned for dialogue documents
    #[serde(default = "default_dialogue_dir")]
    pub dialogue_dir: PathBuf,
    /// File extension of dialogue documents
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Load every dialogue right after discovery
    #[serde(default)]
    pub preload: bool,
    /// Log verbosity for the command-line tool
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            dialogue_dir: default_dialogue_dir(),
            extension: default_extension(),
            preload: false,
            log_level: default_log_level(),
        }
    }
}

impl ParleyConfig {
    /// Platform config location, e.g. `~/.config/parley/parley.toml`
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("parley").join(CONFIG_FILE))
    }

    /// Read a config file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Find and read the active config
    ///
    /// Uses `explicit` when given, otherwise `./parley.toml`, otherwise the
    /// user config file, otherwise the defaults.
    ///
    /// # Errors
    /// Returns an error if the chosen file exists but cannot be parsed, or
    /// if `explicit` cannot be read.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidates = [Some(PathBuf::from(CONFIG_FILE)), Self::user_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!("Using config {}", path.display());
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Write the config as TOML
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Dialogue source for the configured directory
    #[must_use]
    pub fn source(&self) -> DirectorySource {
        DirectorySource::with_extension(&self.dialogue_dir, &self.extension)
    }

    /// Registry over the configured directory, preloaded if requested
    ///
    /// # Errors
    /// Returns an error if the directory cannot be scanned.
    pub fn open_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new(self.source())?;
        if self.preload {
            let loaded = registry.load_all();
            tracing::info!("Preloaded {}/{} dialogue(s)", loaded, registry.len());
        }
        Ok(registry)
    }
}
