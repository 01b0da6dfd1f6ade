//! Sync orchestration -- chain fetch, per-shift reconciliation, notifications.

use chrono::Utc;
use chrono_tz::America::New_York;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::calendar_client::CalendarApi;
use crate::notifier::NotifySink;
use crate::positions;
use crate::sling_client::{fetch_chain, ChainEnd, ChainLimits, ShiftRecord, ShiftSource};
use crate::sync::{sync_shift, SyncOutcome};

/// Orchestrator settings carved out of the full config.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Minimum pause between consecutive shifts.
    pub throttle: Duration,
    pub limits: ChainLimits,
}

/// Per-run tally, reported in the summary notification.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Composes the chain fetcher, position resolver, and event syncer into
/// one sync pass over the upcoming shifts.
pub struct SyncService<S, C, N> {
    source: S,
    calendar: C,
    notifier: N,
    settings: SyncSettings,
    run_lock: Mutex<()>,
}

impl<S: ShiftSource, C: CalendarApi, N: NotifySink> SyncService<S, C, N> {
    pub fn new(source: S, calendar: C, notifier: N, settings: SyncSettings) -> Self {
        Self {
            source,
            calendar,
            notifier,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    /// Run one sync pass. Never propagates errors, and never overlaps a
    /// run already in progress -- a trigger that arrives mid-run is
    /// skipped, not queued.
    pub async fn run(&self) {
        let _guard = match self.run_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("Previous sync run still in progress, skipping this trigger");
                return;
            }
        };

        match self.run_once().await {
            Ok(stats) => {
                tracing::info!(
                    "Sync run finished: {} created, {} skipped, {} failed",
                    stats.created,
                    stats.skipped,
                    stats.failed
                );
                self.notifier
                    .send(&format!(
                        "Sync finished: {} created, {} skipped, {} failed",
                        stats.created, stats.skipped, stats.failed
                    ))
                    .await;
            }
            Err(e) => {
                tracing::error!("Sync run failed: {:#}", e);
                self.notifier.send(&format!("Sync run failed: {e:#}")).await;
            }
        }
    }

    async fn run_once(&self) -> anyhow::Result<RunStats> {
        let reference = Utc::now();
        let chain = fetch_chain(&self.source, reference, self.settings.limits).await;

        match &chain.end {
            ChainEnd::Exhausted => tracing::debug!("Shift chain ended normally"),
            ChainEnd::SourceError(e) => {
                tracing::warn!("Shift chain truncated by source error: {}", e)
            }
            ChainEnd::HorizonReached => {
                tracing::debug!("Shift chain stopped at the lookahead horizon")
            }
            ChainEnd::LengthCapped => tracing::warn!("Shift chain hit the maximum length"),
        }

        tracing::info!("Fetched {} upcoming shifts", chain.shifts.len());

        let mut stats = RunStats::default();
        for (i, shift) in chain.shifts.iter().enumerate() {
            let label = positions::resolve(Some(shift.position_id));
            let outcome = sync_shift(&self.calendar, shift, label).await;
            self.report_outcome(shift, label, &outcome).await;

            match outcome {
                SyncOutcome::Created { .. } => stats.created += 1,
                SyncOutcome::SkippedDuplicate => stats.skipped += 1,
                SyncOutcome::Failed(_) => stats.failed += 1,
            }

            // Upstream rate limits: pause between consecutive shifts.
            if i + 1 < chain.shifts.len() {
                tokio::time::sleep(self.settings.throttle).await;
            }
        }

        Ok(stats)
    }

    async fn report_outcome(&self, shift: &ShiftRecord, label: &str, outcome: &SyncOutcome) {
        let window = format_window(shift);
        match outcome {
            SyncOutcome::Created { link } => {
                match link {
                    Some(link) => tracing::info!("Event created for {} {}: {}", label, window, link),
                    None => tracing::info!("Event created for {} {}", label, window),
                }
                self.notifier
                    .send(&format!("Event created for {label} {window}"))
                    .await;
            }
            SyncOutcome::SkippedDuplicate => {
                tracing::info!("Event for {} already exists", label);
                self.notifier
                    .send(&format!("Event for {label} already exists"))
                    .await;
            }
            SyncOutcome::Failed(e) => {
                tracing::error!("Failed to sync {} {}: {}", label, window, e);
                self.notifier
                    .send(&format!("Error creating event for {label} {window}: {e}"))
                    .await;
            }
        }
    }
}

/// Render a shift window in the calendar's zone for human-facing messages.
fn format_window(shift: &ShiftRecord) -> String {
    let start = shift.start.with_timezone(&New_York);
    let end = shift.end.with_timezone(&New_York);
    format!(
        "from {} to {}",
        start.format("%Y-%m-%d %H:%M"),
        end.format("%Y-%m-%d %H:%M %Z")
    )
}
