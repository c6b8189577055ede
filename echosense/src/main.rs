//! echosense - command-line client for the Echosense call-analytics backend
//!
//! Every subcommand maps to one backend endpoint and prints the decoded
//! response as pretty JSON.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/echosense/config.toml (~/.config/echosense/config.toml)
//! - Logs: $XDG_STATE_HOME/echosense/echosense.log (~/.local/state/echosense/echosense.log)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use echosense_core::api::AudioFile;
use echosense_core::{AnalyticsClient, Config};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "echosense")]
#[command(about = "Query and manage calls on an Echosense analytics backend")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides config and ECHOSENSE_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Write debug logs to the state directory
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the effective configuration
    Config,

    #[command(flatten)]
    Api(ApiCommand),
}

/// Commands that talk to the backend
#[derive(Subcommand)]
enum ApiCommand {
    /// Upload one or more audio recordings for processing
    Upload {
        /// Audio files (mp3, wav, m4a, ogg, flac)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show the processing status of a call
    Status { call_id: String },

    /// Show the diarized transcript of a call
    Transcript { call_id: String },

    /// Show quality scores for a call
    Quality { call_id: String },

    /// Show compliance flags raised for a call
    Compliance { call_id: String },

    /// Show the complete analysis report for a call
    Report { call_id: String },

    /// Show dashboard statistics
    Dashboard {
        /// Trailing window in days (default: 7)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// List recently uploaded calls
    Recent {
        /// Maximum number of calls (default: 10)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show daily quality score trends
    Trends {
        /// Trailing window in days (default: 30)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Summarize compliance flags by type and severity
    ComplianceSummary {
        /// Trailing window in days (default: 7)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Show agent training recommendations
    Training {
        /// Trailing window in days (default: 30)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Delete a call and all of its analysis data
    Delete { call_id: String },

    /// Check that the backend is reachable and healthy
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    config.apply_overrides(args.base_url.clone());

    let _log_guard = if args.verbose {
        Some(
            echosense_core::logging::init(&config.logging)
                .context("failed to initialize logging")?,
        )
    } else {
        None
    };

    match args.command {
        Command::Config => cmd_config(&config),
        Command::Api(command) => {
            let client = AnalyticsClient::from_config(&config.client)
                .context("failed to create API client")?;
            tracing::debug!(base_url = client.base_url(), "client ready");
            run(&client, command).await
        }
    }
}

async fn run(client: &AnalyticsClient, command: ApiCommand) -> Result<()> {
    match command {
        ApiCommand::Upload { files } => cmd_upload(client, files).await,
        ApiCommand::Status { call_id } => {
            print_json(&client.get_processing_status(&call_id).await?)
        }
        ApiCommand::Transcript { call_id } => print_json(&client.get_transcript(&call_id).await?),
        ApiCommand::Quality { call_id } => print_json(&client.get_quality_score(&call_id).await?),
        ApiCommand::Compliance { call_id } => {
            print_json(&client.get_compliance_flags(&call_id).await?)
        }
        ApiCommand::Report { call_id } => print_json(&client.get_full_report(&call_id).await?),
        ApiCommand::Dashboard { days } => print_json(&client.get_dashboard_stats(days).await?),
        ApiCommand::Recent { limit } => print_json(&client.get_recent_calls(limit).await?),
        ApiCommand::Trends { days } => print_json(&client.get_quality_trends(days).await?),
        ApiCommand::ComplianceSummary { days } => {
            print_json(&client.get_compliance_summary(days).await?)
        }
        ApiCommand::Training { days } => {
            print_json(&client.get_training_recommendations(days).await?)
        }
        ApiCommand::Delete { call_id } => print_json(&client.delete_call(&call_id).await?),
        ApiCommand::Health => cmd_health(client).await,
    }
}

async fn cmd_upload(client: &AnalyticsClient, paths: Vec<PathBuf>) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = AudioFile::from_path(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(file);
    }

    if files.len() == 1 {
        let file = files.remove(0);
        print_json(&client.upload_audio(file).await?)
    } else {
        let response = client.upload_bulk(files).await?;
        print_json(&response)?;
        if response.failed > 0 {
            bail!("{} of {} uploads failed", response.failed, response.total);
        }
        Ok(())
    }
}

async fn cmd_health(client: &AnalyticsClient) -> Result<()> {
    let health = client.health_check().await?;
    print_json(&health)?;
    if !health.is_healthy() {
        bail!("backend reported status {:?}", health.status);
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Echosense Client Configuration");
    println!("==============================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!("Log file:        {}", Config::log_path().display());
    println!();

    let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
    print!("{}", rendered);

    if let Err(e) = config.client.validate() {
        println!();
        println!("Warning: {}", e);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render response")?;
    println!("{}", rendered);
    Ok(())
}
