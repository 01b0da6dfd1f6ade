use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use clap::Parser;
use sling_calendar_sync::calendar_client::{CalendarApi, CalendarClient};
use sling_calendar_sync::config::Config;
use sling_calendar_sync::sync::{EventDraft, REMINDER_MINUTES};
use std::path::PathBuf;

/// Insert a one-off shift event, bypassing the Sling chain. Useful for
/// backfilling a shift the sync missed.
#[derive(Parser)]
#[command(name = "add-event")]
#[command(about = "Add a shift event from the command line")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "sling-sync.toml")]
    config: PathBuf,

    /// Event label (e.g. "Front Desk")
    #[arg(short, long)]
    label: String,

    /// Start time, Eastern local: "YYYY-MM-DD HH:MM"
    #[arg(long)]
    start: String,

    /// End time, Eastern local: "YYYY-MM-DD HH:MM"
    #[arg(long)]
    end: String,
}

fn parse_eastern(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))?;

    let local = New_York
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Ambiguous or invalid local time: {}", s))?;

    Ok(local.with_timezone(&Utc))
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let client = CalendarClient::new(&config.calendar).await?;

    let draft = EventDraft {
        summary: cli.label.clone(),
        start: parse_eastern(&cli.start)?,
        end: parse_eastern(&cli.end)?,
        reminder_minutes: REMINDER_MINUTES,
    };

    println!("Adding event: {}", cli.label);
    println!("  Start: {} Eastern -> {} UTC", cli.start, draft.start);
    println!("  End:   {} Eastern -> {} UTC", cli.end, draft.end);

    match client.insert_event(&draft).await? {
        Some(link) => println!("Event added: {}", link),
        None => println!("Event added!"),
    }

    Ok(())
}
