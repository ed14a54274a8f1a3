use serde::{Deserialize, Serialize};

/// Editing session configuration (camelCase JSON, every field optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    /// Quiet period after the last commit before the page is handed to persistence
    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,

    /// Prefix used to build document urls for deep links
    #[serde(default = "default_document_url_base")]
    pub document_url_base: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Typing within this window of the previous keystroke joins its undo step
    #[serde(default = "default_merge_window_ms")]
    pub merge_window_ms: u64,
}

fn default_sync_debounce_ms() -> u64 {
    1000
}

fn default_document_url_base() -> String {
    "quire://page".to_string()
}

fn default_max_entries() -> usize {
    100
}

fn default_merge_window_ms() -> u64 {
    500
}

impl EditorConfig {
    pub fn document_url(&self, document_id: &str) -> String {
        format!("{}/{}", self.document_url_base.trim_end_matches('/'), document_id)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            sync_debounce_ms: default_sync_debounce_ms(),
            document_url_base: default_document_url_base(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            merge_window_ms: default_merge_window_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "history": { "mergeWindowMs": 250 },
            "documentUrlBase": "https://notes.example.com/p/"
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history.merge_window_ms, 250);
        assert_eq!(config.history.max_entries, 100);
        assert_eq!(config.sync_debounce_ms, 1000);
        assert_eq!(
            config.document_url("abc"),
            "https://notes.example.com/p/abc"
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
