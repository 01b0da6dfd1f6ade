use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::time;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sling_calendar_sync::calendar_client::CalendarClient;
use sling_calendar_sync::config::Config;
use sling_calendar_sync::notifier::{DiscordNotifier, NotifySink};
use sling_calendar_sync::service::{SyncService, SyncSettings};
use sling_calendar_sync::sling_client::{ChainLimits, SlingClient};

/// Sync upcoming Sling shifts into Google Calendar
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "sling-sync.toml")]
    config: PathBuf,

    /// Run a single sync pass and exit
    #[arg(long)]
    once: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install crypto provider");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sling_calendar_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.print_example_config {
        print!("{}", toml::to_string_pretty(&Config::example())?);
        return Ok(());
    }

    let config = Config::load(&args.config).context("Failed to load configuration")?;

    let notifier = DiscordNotifier::new(config.notify.resolve_webhook());

    tracing::info!("Authorizing Google Calendar access");
    let calendar = CalendarClient::new(&config.calendar)
        .await
        .context("Failed to authorize Google Calendar access")?;
    notifier.send("Authorized to access Google Calendar").await;

    let sling = SlingClient::new(
        config.sling.resolve_token()?,
        config.sling.base_url.clone(),
    );

    let settings = SyncSettings {
        throttle: Duration::from_secs(config.sync.throttle_secs),
        limits: ChainLimits {
            max_len: config.sync.max_chain_len,
            lookahead_days: config.sync.lookahead_days,
        },
    };
    let service = SyncService::new(sling, calendar, notifier.clone(), settings);

    if args.once {
        service.run().await;
        return Ok(());
    }

    // First tick fires immediately, then every interval from process start.
    let interval = Duration::from_secs(config.sync.interval_secs);
    let sync_handle = tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            tracing::info!("Running the job");
            notifier.send("Running the job").await;
            service.run().await;
        }
    });

    tracing::info!(
        "Shift sync running (interval: {:?}). Press Ctrl+C to stop.",
        interval
    );
    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping");

    sync_handle.abort();

    Ok(())
}
