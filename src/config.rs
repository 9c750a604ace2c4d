//! Configuration for the `mdiff` command line tool
//!
//! Read from `~/.config/merkle_diff/config.json` (or the platform's config
//! directory) unless a path is given explicitly. Every field is optional.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format (json or text)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// How input files are turned into tree items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--format` is not given
    pub format: OutputFormat,
    /// Sort items before building, so replicas agree on leaf order
    pub sort: bool,
    /// Drop lines that are empty after trimming
    pub skip_blank: bool,
    /// Trim surrounding whitespace from every line
    pub trim: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: OutputFormat::Json,
            sort: false,
            skip_blank: true,
            trim: false,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("merkle_diff").join("config.json"))
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load `explicit` if given, else the default file if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Split input text into items, one per line
    pub fn items_from_str(&self, text: &str) -> Vec<String> {
        let mut items: Vec<String> = text
            .lines()
            .map(|line| if self.trim { line.trim() } else { line })
            .filter(|line| !(self.skip_blank && line.trim().is_empty()))
            .map(str::to_string)
            .collect();

        if self.sort {
            items.sort();
        }
        items
    }

    /// Read a file and split it into items
    pub fn read_items(&self, path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.items_from_str(&text))
    }
}
