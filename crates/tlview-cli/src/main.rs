mod render;

use anyhow::Context;
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tlview_core::TimeFormat;
use tlview_history::{HistoryClient, HistorySource};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tlview-cli")]
#[command(about = "Inspect a location-history export from the command line")]
struct Cli {
    /// History file path or http(s) URL; overrides `TLVIEW_HISTORY_SOURCE`.
    #[arg(long, global = true)]
    source: Option<String>,

    /// IANA zone used to split days and render times; overrides `TLVIEW_TIMEZONE`.
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Render times as `hh:MM AM` instead of 24-hour.
    #[arg(long, global = true)]
    hour12: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the timeline for one day.
    Day {
        /// Day as YYYY-MM-DD.
        date: String,
    },
    /// List days that have records, with per-day counts.
    Days,
    /// Print normalized records as JSON.
    Export {
        /// Only export records starting on this day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the frame-by-frame replay of one day.
    Playback {
        /// Day as YYYY-MM-DD.
        date: String,
    },
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    tlview_history::parse_day(raw)
        .with_context(|| format!("invalid date {raw:?}; expected YYYY-MM-DD"))
}

fn parse_timezone(raw: Option<&str>, default: Tz) -> anyhow::Result<Tz> {
    match raw {
        None => Ok(default),
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("unknown time zone {name:?}")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("tlview-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = tlview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let tz = parse_timezone(cli.tz.as_deref(), config.timezone)?;
    let time_format = if cli.hour12 {
        TimeFormat::TwelveHour
    } else {
        config.time_format
    };
    let source = HistorySource::parse(cli.source.as_deref().unwrap_or(&config.history_source));
    tracing::debug!(%source, tz = tz.name(), %time_format, ?command, "running command");

    let client = HistoryClient::from_config(&config)?;
    let records = client
        .load(&source)
        .await
        .with_context(|| format!("failed to load history from {source}"))?;

    let mut out = std::io::stdout().lock();
    match command {
        Commands::Day { date } => {
            render::day(&mut out, &records, parse_date(&date)?, tz, time_format)?;
        }
        Commands::Days => render::days(&mut out, &records, tz)?,
        Commands::Export { date } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            render::export(&mut out, &records, date, tz)?;
        }
        Commands::Playback { date } => {
            render::playback(&mut out, &records, parse_date(&date)?, tz)?;
        }
    }

    Ok(())
}
