use quire_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "quire.config.json";

/// Quire configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding document JSON files
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Use the OS clipboard instead of an in-memory one
    #[serde(default)]
    pub system_clipboard: bool,

    /// Session settings: history, sync debounce, document urls
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_docs_dir() -> String {
    "docs".to_string()
}

impl Config {
    /// Load config from an explicit path, or from `quire.config.json` in
    /// `cwd` when present
    pub fn load(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME),
        };

        if explicit.is_some() || config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the documents directory
    pub fn get_docs_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.docs_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            system_clipboard: false,
            editor: EditorConfig::default(),
        }
    }
}
