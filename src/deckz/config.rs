use crate::error::{DeckzError, Result};
use crate::model::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BASELINE_FILE: &str = "vault.json";
const DEFAULT_DECK_NAME: &str = "General";

pub const CONFIG_KEYS: &[&str] = &["baseline-path", "default-deck-name", "default-layout"];

/// Configuration for deckz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckzConfig {
    /// Baseline document; relative paths resolve against the data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_path: Option<PathBuf>,

    /// Name of the deck created when the collection would otherwise be empty
    #[serde(default = "default_deck_name")]
    pub default_deck_name: String,

    /// Layout given to newly created decks
    #[serde(default)]
    pub default_layout: Layout,
}

fn default_deck_name() -> String {
    DEFAULT_DECK_NAME.to_string()
}

impl Default for DeckzConfig {
    fn default() -> Self {
        Self {
            baseline_path: None,
            default_deck_name: default_deck_name(),
            default_layout: Layout::default(),
        }
    }
}

impl DeckzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DeckzError::Io)?;
        let config: DeckzConfig =
            serde_json::from_str(&content).map_err(DeckzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DeckzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DeckzError::Serialization)?;
        fs::write(config_path, content).map_err(DeckzError::Io)?;
        Ok(())
    }

    /// Where the baseline document is read from.
    pub fn resolve_baseline_path(&self, data_dir: &Path) -> PathBuf {
        match &self.baseline_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DEFAULT_BASELINE_FILE),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "baseline-path" => Some(
                self.baseline_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| DEFAULT_BASELINE_FILE.to_string()),
            ),
            "default-deck-name" => Some(self.default_deck_name.clone()),
            "default-layout" => Some(self.default_layout.as_str().to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "baseline-path" => {
                let value = value.trim();
                self.baseline_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            "default-deck-name" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("default-deck-name cannot be empty".to_string());
                }
                self.default_deck_name = value.to_string();
                Ok(())
            }
            "default-layout" => {
                self.default_layout = value.parse()?;
                Ok(())
            }
            other => Err(format!("Unknown config key: {}", other)),
        }
    }
}
