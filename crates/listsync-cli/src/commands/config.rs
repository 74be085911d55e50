//! Config command - View and manage listsync configuration
//!
//! Provides the `listsync config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON) with the API key masked
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use listsync_core::config::Config;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "mailchimp.api_key")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    ///
    /// Returns whether the command succeeded.
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx, format),
            ConfigCommand::Set { key, value } => self.execute_set(ctx, key, value, format),
            ConfigCommand::Validate => self.execute_validate(ctx, format),
        }
    }

    /// Show current configuration
    fn execute_show(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config = masked(&ctx.config);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(true)
    }

    /// Set a configuration value using dot-notation
    fn execute_set(
        &self,
        ctx: &AppContext,
        key: &str,
        value: &str,
        format: OutputFormat,
    ) -> Result<bool> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config_path = &ctx.config_path;
        let mut config = ctx.config.clone();

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                formatter.info("  mailchimp.api_key   - API key, e.g. 0123...cdef-us6");
                formatter.info("  mailchimp.base_url  - API root override (\"none\" to clear)");
                formatter.info("  database.path       - SQLite database file");
                formatter.info("  database.max_connections  - pool size");
                formatter.info("  database.busy_timeout_secs - lock wait in seconds");
                formatter.info("  logging.level       - trace|debug|info|warn|error");
                formatter.info("  logging.json        - true|false");
            }
            return Ok(false);
        }

        let errors = config.validate();
        if !errors.is_empty() {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "errors": error_msgs,
                }));
            } else {
                formatter.error(&format!(
                    "Invalid value for '{}': {}",
                    key,
                    error_msgs.join("; ")
                ));
            }
            return Ok(false);
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create configuration directory")?;
        }

        let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
        std::fs::write(config_path, &yaml).context("Failed to write configuration file")?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {}", key));
            formatter.info(&format!("Saved to {}", config_path.display()));
        }

        Ok(true)
    }

    /// Validate configuration file
    fn execute_validate(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config_path = &ctx.config_path;

        // Load explicitly; parse errors are findings, not defaults
        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                let message = if config_path.exists() {
                    format!("Failed to parse configuration: {:#}", e)
                } else {
                    "Configuration file not found".to_string()
                };

                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                    formatter.info(&format!("File: {}", config_path.display()));
                    formatter.info("Run 'listsync config set mailchimp.api_key <key>' to create one.");
                }
                return Ok(false);
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if matches!(format, OutputFormat::Json) {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(errors.is_empty())
    }
}

/// Copy of `config` with all but the last four characters of the key hidden
fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    if let Some(key) = config.mailchimp.api_key.as_mut() {
        let visible = key.len().saturating_sub(4);
        if key.is_char_boundary(visible) {
            *key = format!("{}{}", "*".repeat(visible), &key[visible..]);
        }
    }
    config
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = |v: &str| {
        if v.is_empty() || v == "none" {
            None
        } else {
            Some(v.to_string())
        }
    };

    match key {
        // --- mailchimp ---
        "mailchimp.api_key" => {
            config.mailchimp.api_key = optional(value);
        }
        "mailchimp.base_url" => {
            config.mailchimp.base_url = optional(value);
        }

        // --- database ---
        "database.path" => {
            config.database.path = PathBuf::from(value);
        }
        "database.max_connections" => {
            config.database.max_connections = value
                .parse()
                .context("Expected a number for database.max_connections")?;
        }
        "database.busy_timeout_secs" => {
            config.database.busy_timeout_secs = value
                .parse()
                .context("Expected a number for database.busy_timeout_secs")?;
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = value.to_string();
        }
        "logging.json" => {
            config.logging.json = value
                .parse::<bool>()
                .context("Expected true or false for logging.json")?;
        }

        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}
