//! invitekit - turn meeting descriptions into calendar events
//!
//! Usage:
//!   invitekit create "<description>"   Run the pipeline and submit or export
//!   invitekit calendars                List calendars of the configured grant
//!   invitekit events                   List recent events of a calendar
//!
//! JSON goes to stdout so the output can be piped; logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use invitekit_common::{init_tracing, LogFormat};
use invitekit_core::{
    CalendarService, EventExporter, PipelineOrchestrator, PipelineSettings,
    RemoteSubmissionAdapter,
};
use invitekit_domain::constants::DEFAULT_EVENT_LIST_LIMIT;
use invitekit_domain::Config;
use invitekit_infra::{config, CalendarApiClient, FileExportAdapter, OpenAiExtractionClient};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "invitekit", version, about = "Natural-language meeting descriptions to calendar events")]
struct Cli {
    /// Config file (JSON or TOML); environment variables are used otherwise
    #[arg(long, global = true, env = "INVITEKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract an event from a description and submit or export it
    Create {
        /// Free-text meeting description
        description: String,

        /// Reference instant for relative expressions (RFC 3339, default now)
        #[arg(long)]
        reference: Option<DateTime<Utc>>,

        /// Write an .ics file instead of submitting to the calendar service
        #[arg(long, conflicts_with = "calendar")]
        ics: Option<PathBuf>,

        /// Calendar to submit to (defaults to the configured calendar)
        #[arg(long)]
        calendar: Option<String>,
    },

    /// List calendars visible to the configured grant
    Calendars,

    /// List events of one calendar
    Events {
        #[arg(long)]
        calendar: Option<String>,

        #[arg(long, default_value_t = DEFAULT_EVENT_LIST_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => config::load_from_file(Some(path))?,
        None => config::load()?,
    };

    init_tracing(LogFormat::from_json_flag(config.logging.json), &config.logging.level);

    match cli.command {
        Command::Create { description, reference, ics, calendar } => {
            create(&config, &description, reference.unwrap_or_else(Utc::now), ics, calendar)
                .await
        }
        Command::Calendars => {
            let calendars = calendar_client(&config)?.list_calendars().await?;
            print_json(&calendars)
        }
        Command::Events { calendar, limit } => {
            let calendar_id = calendar_id(&config, calendar)?;
            let events = calendar_client(&config)?.list_events(&calendar_id, limit).await?;
            print_json(&events)
        }
    }
}

async fn create(
    config: &Config,
    description: &str,
    reference: DateTime<Utc>,
    ics: Option<PathBuf>,
    calendar: Option<String>,
) -> Result<()> {
    let settings = Arc::new(PipelineSettings::from_config(&config.pipeline)?);
    let extraction = Arc::new(OpenAiExtractionClient::from_config(&config.extraction)?);

    let exporter: Arc<dyn EventExporter> = match ics {
        Some(path) => Arc::new(FileExportAdapter::new(path)),
        None => {
            let calendar_id = calendar_id(config, calendar)?;
            Arc::new(RemoteSubmissionAdapter::new(Arc::new(calendar_client(config)?), calendar_id))
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending calls");
            on_interrupt.cancel();
        }
    });

    info!(%reference, timezone = %settings.home_timezone, "Running pipeline");
    let pipeline = PipelineOrchestrator::new(extraction, exporter, settings);
    let outcome = pipeline
        .run_with_cancellation(description, reference, &cancel)
        .await
        .map_err(|failure| anyhow!(failure))?;

    print_json(&outcome)
}

fn calendar_client(config: &Config) -> Result<CalendarApiClient> {
    CalendarApiClient::from_config(&config.calendar).context(
        "calendar service is not configured (set INVITEKIT_CALENDAR_GRANT_ID and INVITEKIT_CALENDAR_API_KEY)",
    )
}

fn calendar_id(config: &Config, explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| config.calendar.calendar_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| anyhow!("no calendar given; pass --calendar or set INVITEKIT_CALENDAR_ID"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
