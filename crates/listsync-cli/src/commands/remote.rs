//! Remote command - Check the Mailchimp connection

use anyhow::Result;
use clap::Subcommand;
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

/// Remote subcommands
#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// Check the API key and reachability of Mailchimp
    Ping,
}

impl RemoteCommand {
    /// Execute the remote command
    ///
    /// Returns whether Mailchimp answered.
    pub async fn execute(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        match self {
            RemoteCommand::Ping => self.execute_ping(ctx, format).await,
        }
    }

    async fn execute_ping(&self, ctx: &AppContext, format: OutputFormat) -> Result<bool> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let client = ctx.mailchimp_client()?;

        info!(base_url = %client.base_url(), "Pinging Mailchimp");

        let (ok, message) = match client.ping().await {
            Ok(health) => (true, health),
            Err(e) => (false, e.to_string()),
        };

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": ok,
                "base_url": client.base_url(),
                "message": message,
            }));
        } else if ok {
            formatter.success(&message);
            formatter.info(&format!("API root: {}", client.base_url()));
        } else {
            formatter.error(&message);
            formatter.info(&format!("API root: {}", client.base_url()));
        }

        Ok(ok)
    }
}
