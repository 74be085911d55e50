//! CLI subcommands

pub mod config;
pub mod lists;
pub mod members;
pub mod remote;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use listsync_core::domain::Attributes;
use listsync_core::usecases::{ApiResponse, SyncResult};
use serde_json::Value;

/// Attribute map given inline or from a file
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct AttributeInput {
    /// Attributes as a JSON object, e.g. '{"name": "Newsletter"}'
    #[arg(long)]
    pub data: Option<String>,

    /// Path to a file holding the JSON object
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl AttributeInput {
    /// Reads and parses the attribute object
    pub fn read(&self) -> Result<Attributes> {
        let text = match (&self.data, &self.file) {
            (Some(data), _) => data.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("Either --data or --file is required"),
        };
        parse_attributes(&text)
    }
}

/// Parses a JSON object into an attribute map
pub fn parse_attributes(text: &str) -> Result<Attributes> {
    let value: Value = serde_json::from_str(text).context("Attributes are not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Attributes must be a JSON object"),
    }
}

/// Collapses an operation result into a response
pub fn into_response(result: SyncResult<ApiResponse>) -> ApiResponse {
    result.unwrap_or_else(|err| ApiResponse::from_error(&err))
}
