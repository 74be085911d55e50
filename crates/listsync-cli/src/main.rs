//! listsync CLI - Command-line interface for listsync
//!
//! Provides commands for:
//! - Managing mailing lists and their members
//! - Pushing local changes to Mailchimp
//! - Viewing and editing configuration
//! - Checking the Mailchimp connection

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    config::ConfigCommand, lists::ListsCommand, members::MembersCommand, remote::RemoteCommand,
};
use context::AppContext;
use output::{render_response, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "listsync",
    version,
    about = "Keep mailing lists and members in sync with Mailchimp"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage mailing lists
    #[command(subcommand)]
    Lists(ListsCommand),
    /// Manage list members
    #[command(subcommand)]
    Members(MembersCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Check the Mailchimp connection
    #[command(subcommand)]
    Remote(RemoteCommand),
}

/// Installs the tracing subscriber
///
/// `RUST_LOG` wins; otherwise `-v` flags raise the configured level. Logs go
/// to stderr so stdout stays parseable.
fn init_tracing(verbose: u8, level: &str, json: bool) {
    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config.clone());
    init_tracing(
        cli.verbose,
        &ctx.config.logging.level,
        ctx.config.logging.json,
    );

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let success = match cli.command {
        Commands::Lists(cmd) => {
            let response = cmd.execute(&ctx).await?;
            render_response(format, &response);
            response.is_success()
        }
        Commands::Members(cmd) => {
            let response = cmd.execute(&ctx).await?;
            render_response(format, &response);
            response.is_success()
        }
        Commands::Config(cmd) => cmd.execute(&ctx, format).await?,
        Commands::Remote(cmd) => cmd.execute(&ctx, format).await?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
