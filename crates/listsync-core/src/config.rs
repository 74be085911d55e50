//! Configuration module for listsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for listsync.
///
/// Missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mailchimp: MailchimpConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Mailchimp Marketing API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailchimpConfig {
    /// API key, e.g. `0123456789abcdef-us6`. `None` until configured.
    pub api_key: Option<String>,
    /// Overrides the API root derived from the key's data center.
    pub base_url: Option<String>,
}

/// Local SQLite store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Pool size for the database file.
    pub max_connections: u32,
    /// Seconds a writer waits on a locked database before failing.
    pub busy_timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/listsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("listsync")
            .join("config.yaml")
    }
}

impl MailchimpConfig {
    /// Data center suffix of the API key (`us6` in `abc123-us6`).
    pub fn data_center(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .and_then(|key| key.rsplit_once('-'))
            .map(|(_, dc)| dc)
            .filter(|dc| !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()))
    }

    /// API root: the explicit `base_url`, else derived from the data center.
    pub fn resolved_base_url(&self) -> Option<String> {
        match &self.base_url {
            Some(url) => Some(url.trim_end_matches('/').to_string()),
            None => self
                .data_center()
                .map(|dc| format!("https://{dc}.api.mailchimp.com/3.0")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("listsync")
                .join("listsync.db"),
            max_connections: 5,
            busy_timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"logging.level"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. A missing API key
    /// is not an error; commands that talk to Mailchimp check for it.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- mailchimp ---
        if let Some(key) = &self.mailchimp.api_key {
            if key.trim().is_empty() {
                errors.push(ValidationError {
                    field: "mailchimp.api_key".into(),
                    message: "must not be empty".into(),
                });
            } else if self.mailchimp.base_url.is_none() && self.mailchimp.data_center().is_none() {
                errors.push(ValidationError {
                    field: "mailchimp.api_key".into(),
                    message: "missing data center suffix (e.g. '-us6'); set mailchimp.base_url instead"
                        .into(),
                });
            }
        }
        if let Some(url) = &self.mailchimp.base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                errors.push(ValidationError {
                    field: "mailchimp.base_url".into(),
                    message: format!("must be an http(s) URL: {url}"),
                });
            }
        }

        // --- database ---
        if self.database.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "database.path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.database.max_connections == 0 {
            errors.push(ValidationError {
                field: "database.max_connections".into(),
                message: "must be at least 1".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use listsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .mailchimp_api_key("0123456789abcdef-us6")
///     .database_path(PathBuf::from("/var/lib/listsync/listsync.db"))
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- mailchimp ---

    pub fn mailchimp_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.mailchimp.api_key = Some(key.into());
        self
    }

    pub fn mailchimp_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.mailchimp.base_url = Some(url.into());
        self
    }

    // --- database ---

    pub fn database_path(mut self, path: PathBuf) -> Self {
        self.config.database.path = path;
        self
    }

    pub fn database_max_connections(mut self, n: u32) -> Self {
        self.config.database.max_connections = n;
        self
    }

    pub fn database_busy_timeout_secs(mut self, secs: u64) -> Self {
        self.config.database.busy_timeout_secs = secs;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert!(cfg.mailchimp.api_key.is_none());
        assert!(cfg.mailchimp.base_url.is_none());
        assert!(cfg.database.path.ends_with("listsync/listsync.db"));
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.busy_timeout_secs, 5);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    #[test]
    fn default_path_is_under_listsync() {
        let path = Config::default_path();
        assert!(path.ends_with("listsync/config.yaml"));
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
mailchimp:
  api_key: "0123456789abcdef-us6"
database:
  path: /tmp/listsync-test.db
logging:
  level: debug
  json: true
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.mailchimp.api_key.as_deref(), Some("0123456789abcdef-us6"));
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/listsync-test.db"));
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn load_partial_yaml_uses_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"logging:\n  level: warn\n").unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.logging.level, "warn");
        assert!(!cfg.logging.json);
        assert!(cfg.mailchimp.api_key.is_none());
        assert!(cfg.database.path.ends_with("listsync.db"));
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    // -- Mailchimp endpoint --

    #[test]
    fn base_url_derived_from_data_center() {
        let cfg = ConfigBuilder::new()
            .mailchimp_api_key("0123456789abcdef-us6")
            .build();
        assert_eq!(cfg.mailchimp.data_center(), Some("us6"));
        assert_eq!(
            cfg.mailchimp.resolved_base_url().as_deref(),
            Some("https://us6.api.mailchimp.com/3.0")
        );
    }

    #[test]
    fn explicit_base_url_wins() {
        let cfg = ConfigBuilder::new()
            .mailchimp_api_key("0123456789abcdef-us6")
            .mailchimp_base_url("http://127.0.0.1:8080/3.0/")
            .build();
        assert_eq!(
            cfg.mailchimp.resolved_base_url().as_deref(),
            Some("http://127.0.0.1:8080/3.0")
        );
    }

    #[test]
    fn no_key_no_base_url() {
        assert!(Config::default().mailchimp.resolved_base_url().is_none());
    }

    // -- Validation --

    #[test]
    fn validate_catches_key_without_data_center() {
        let mut cfg = Config::default();
        cfg.mailchimp.api_key = Some("0123456789abcdef".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "mailchimp.api_key"));

        cfg.mailchimp.base_url = Some("https://us6.api.mailchimp.com/3.0".to_string());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_catches_empty_key() {
        let mut cfg = Config::default();
        cfg.mailchimp.api_key = Some("  ".to_string());
        let errors = cfg.validate();
        assert!(errors
            .iter()
            .any(|e| e.field == "mailchimp.api_key" && e.message == "must not be empty"));
    }

    #[test]
    fn validate_catches_bad_base_url() {
        let mut cfg = Config::default();
        cfg.mailchimp.base_url = Some("ftp://example.com".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "mailchimp.base_url"));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_catches_empty_pool() {
        let cfg = ConfigBuilder::new().database_max_connections(0).build();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "database.max_connections"));
    }

    #[test]
    fn validate_collects_multiple_errors() {
        let mut cfg = Config::default();
        cfg.database.path = PathBuf::new();
        cfg.logging.level = "loud".to_string();
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["database.path", "logging.level"]);
    }

    // -- Builder --

    #[test]
    fn builder_build_validated_rejects_invalid() {
        let result = ConfigBuilder::new().logging_level("shout").build_validated();
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string().split(':').next(), Some("logging.level"));
    }

    #[test]
    fn builder_overrides() {
        let cfg = ConfigBuilder::new()
            .database_path(PathBuf::from("/tmp/x.db"))
            .database_busy_timeout_secs(30)
            .logging_json(true)
            .build_validated()
            .expect("valid config");
        assert_eq!(cfg.database.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.database.busy_timeout_secs, 30);
        assert!(cfg.logging.json);
    }
}
