//! User settings and preferences
//!
//! Read from ~/.joinwise/config.toml (or a path given with `--config`).
//! Every field has a default, so a missing or partial file is fine.

use crate::completer::scanner::CursorLine;
use crate::config::ConnectionConfig;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub completion: CompletionSettings,
}

/// Knobs for the suggestion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// How much of the cursor line the statement scanner reads
    #[serde(default)]
    pub cursor_line: CursorLine,

    /// Offer the plain table list after the join-aware suggestions
    #[serde(default = "default_true")]
    pub table_list_after_join: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            completion: CompletionSettings::default(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            cursor_line: CursorLine::default(),
            table_list_after_join: default_true(),
        }
    }
}

/// Load settings from ~/.joinwise/config.toml
pub fn load_settings() -> ConfigResult<Settings> {
    let path = ConnectionConfig::config_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_settings_from(&path)
}

/// Load settings from an explicit path
pub fn load_settings_from(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::NotFound(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.completion.cursor_line, CursorLine::Truncate);
        assert!(settings.completion.table_list_after_join);
    }

    #[test]
    fn test_partial_completion_section() {
        let settings: Settings = toml::from_str(
            r#"
            log_level = "joinwise=debug"

            [completion]
            cursor_line = "whole"
            "#,
        )
        .unwrap();
        assert_eq!(settings.log_level, "joinwise=debug");
        assert_eq!(settings.completion.cursor_line, CursorLine::Whole);
        assert!(settings.completion.table_list_after_join);
    }

    #[test]
    fn test_unknown_cursor_line_mode_rejected() {
        let result: Result<Settings, _> = toml::from_str(
            r#"
            [completion]
            cursor_line = "sometimes"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_path_is_not_found() {
        let result = load_settings_from(Path::new("/nonexistent/joinwise/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
