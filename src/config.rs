//! Configuration module.
//!
//! Handles loading, validating, and merging `folio.toml`. Stock defaults are
//! the base layer; a user config file overrides any subset of them.
//!
//! ## Config File Location
//!
//! `folio.toml` is read from the working directory, or from the path given
//! with `--config`. Without a file, stock defaults are used.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "content/projects"   # Directory of project .md files
//!
//! [content]
//! default_date = "2024-01-01"        # Sort date for projects without one
//! words_per_minute = 200             # Reading-time speed
//! hidden_markers = ["HIDDEN PROJECT", "DO NOT PUBLISH"]
//!
//! [related]
//! default_limit = 3                  # Related projects when no limit given
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! cache_control = "public, s-maxage=3600, stale-while-revalidate=86400"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [server]
//! port = 8080
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in a directory.
pub const CONFIG_FILENAME: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `folio.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// Directory holding the project Markdown files.
    pub content_dir: String,
    /// Loader behavior.
    pub content: ContentConfig,
    /// Related-projects ranking.
    pub related: RelatedConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            content_dir: "content/projects".to_string(),
            content: ContentConfig::default(),
            related: RelatedConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content_dir must not be empty".into(),
            ));
        }
        if self.content.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "content.words_per_minute must be greater than 0".into(),
            ));
        }
        self.content.parsed_default_date()?;
        if self.content.hidden_markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::Validation(
                "content.hidden_markers must not contain empty strings".into(),
            ));
        }
        if self.server.cache_control.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.cache_control must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// `YYYY-MM-DD` date used to order projects without a usable `date`.
    pub default_date: String,
    /// Reading speed for the derived reading time.
    pub words_per_minute: usize,
    /// Phrases that keep an entry off the site wherever they appear.
    pub hidden_markers: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_date: "2024-01-01".to_string(),
            words_per_minute: 200,
            hidden_markers: vec!["HIDDEN PROJECT".to_string(), "DO NOT PUBLISH".to_string()],
        }
    }
}

impl ContentConfig {
    /// The default sort date as a calendar date.
    pub fn parsed_default_date(&self) -> Result<NaiveDate, ConfigError> {
        NaiveDate::parse_from_str(&self.default_date, "%Y-%m-%d").map_err(|_| {
            ConfigError::Validation(format!(
                "content.default_date must be YYYY-MM-DD, got {:?}",
                self.default_date
            ))
        })
    }
}

/// Related-projects settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelatedConfig {
    /// Number of related projects returned when the caller gives no limit.
    pub default_limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self { default_limit: 3 }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `Cache-Control` value on successful responses. Content only changes
    /// at deploy time, so responses are publicly cacheable.
    pub cache_control: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cache_control: "public, s-maxage=3600, stale-while-revalidate=86400".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FolioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<FolioConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FolioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `folio.toml` from a directory, falling back to stock defaults when
/// the file does not exist.
pub fn load_config(dir: &Path) -> Result<FolioConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// Load an explicit config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<FolioConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `folio.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Directory of project Markdown files (one project per .md file).
content_dir = "content/projects"

# ---------------------------------------------------------------------------
# Content loading
# ---------------------------------------------------------------------------
[content]
# Projects without a usable `date` sort as if dated on this day.
# The default is only used for ordering; it never appears in responses.
default_date = "2024-01-01"

# Reading speed used to derive `readingTime` from the body.
words_per_minute = 200

# Any file containing one of these phrases is left off the site.
# Files whose content starts with `<!--` are always hidden.
hidden_markers = ["HIDDEN PROJECT", "DO NOT PUBLISH"]

# ---------------------------------------------------------------------------
# Related projects
# ---------------------------------------------------------------------------
[related]
# How many related projects to return when the request has no `limit`.
default_limit = 3

# ---------------------------------------------------------------------------
# HTTP server (`folio serve`)
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 3000

# Cache-Control header on successful responses.
cache_control = "public, s-maxage=3600, stale-while-revalidate=86400"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = FolioConfig::default();
        assert_eq!(config.content_dir, "content/projects");
        assert_eq!(config.content.default_date, "2024-01-01");
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(
            config.content.hidden_markers,
            vec!["HIDDEN PROJECT", "DO NOT PUBLISH"]
        );
        assert_eq!(config.related.default_limit, 3);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(FolioConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        let defaults = FolioConfig::default();
        assert_eq!(config.content_dir, defaults.content_dir);
        assert_eq!(config.content.default_date, defaults.content.default_date);
        assert_eq!(
            config.content.hidden_markers,
            defaults.content.hidden_markers
        );
        assert_eq!(config.server.cache_control, defaults.server.cache_control);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
port = 8080
"#;
        let config: FolioConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        // Defaults preserved
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.related.default_limit, 3);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_dir, "content/projects");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
content_dir = "projects"

[content]
words_per_minute = 250
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.content_dir, "projects");
        assert_eq!(config.content.words_per_minute, 250);
        // Sibling keys in the same table keep their defaults
        assert_eq!(config.content.default_date, "2024-01-01");
    }

    #[test]
    fn load_config_file_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not [valid toml").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_arrays_replace_not_append() {
        let base: toml::Value = toml::from_str("[content]\nhidden_markers = [\"A\", \"B\"]").unwrap();
        let overlay: toml::Value = toml::from_str("[content]\nhidden_markers = [\"C\"]").unwrap();
        let merged = merge_toml(base, overlay);
        let markers = merged["content"]["hidden_markers"].as_array().unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].as_str(), Some("C"));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value =
            toml::from_str("[server]\nhost = \"127.0.0.1\"\nport = 3000").unwrap();
        let overlay: toml::Value = toml::from_str("[server]\nport = 9000").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["server"]["host"].as_str(), Some("127.0.0.1"));
        assert_eq!(merged["server"]["port"].as_integer(), Some(9000));
    }

    // =========================================================================
    // Unknown keys and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[server]\nprot = 1").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_section_rejected() {
        let overlay: toml::Value = toml::from_str("[colors]\nbg = \"#fff\"").unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    #[test]
    fn validate_words_per_minute_zero() {
        let mut config = FolioConfig::default();
        config.content.words_per_minute = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_bad_default_date() {
        let mut config = FolioConfig::default();
        config.content.default_date = "Jan 1st".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_date"));
    }

    #[test]
    fn validate_empty_marker() {
        let mut config = FolioConfig::default();
        config.content.hidden_markers.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_cache_control() {
        let mut config = FolioConfig::default();
        config.server.cache_control = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parsed_default_date_is_calendar_date() {
        let config = ContentConfig::default();
        assert_eq!(
            config.parsed_default_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
