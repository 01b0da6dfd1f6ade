//! Google Calendar access -- dedup queries and event inserts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, EventReminder, EventReminders};
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::path::Path;
use thiserror::Error;

use crate::config::CalendarConfig;
use crate::sync::EventDraft;

/// Calendar events are always written in this zone.
pub const CALENDAR_TIME_ZONE: &str = "America/New_York";

/// Per-call calendar failure, tagged by direction so the sync outcome can
/// tell a failed dedup check from a failed insert.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar read failed: {0:#}")]
    Read(anyhow::Error),

    #[error("calendar write failed: {0:#}")]
    Write(anyhow::Error),
}

/// The calendar operations the sync engine needs.
#[allow(async_fn_in_trait)]
pub trait CalendarApi {
    /// True if any event overlapping `[start, end]` matches `summary`.
    async fn has_matching_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, CalendarError>;

    /// Insert a new event, returning its canonical link when the API
    /// provides one.
    async fn insert_event(&self, draft: &EventDraft) -> Result<Option<String>, CalendarError>;
}

/// Client for interacting with the Google Calendar API.
pub struct CalendarClient {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    calendar_id: String,
}

impl CalendarClient {
    /// Build an authorized client. Runs the interactive consent flow
    /// (browser + local redirect listener) on first use; afterwards the
    /// cached token is loaded from disk and refreshed transparently.
    pub async fn new(config: &CalendarConfig) -> Result<Self> {
        let secret =
            google_calendar3::yup_oauth2::read_application_secret(&config.credentials_path)
                .await
                .context("Failed to read OAuth credentials")?;

        let auth = google_calendar3::yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            google_calendar3::yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(Path::new(&config.token_cache_path))
        .build()
        .await
        .context("Failed to build authenticator")?;

        let connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("Failed to load native TLS roots")?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = CalendarHub::new(client, auth);

        Ok(Self {
            hub,
            calendar_id: config.calendar_id.clone(),
        })
    }
}

impl CalendarApi for CalendarClient {
    async fn has_matching_event(
        &self,
        summary: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, CalendarError> {
        let (_, events) = self
            .hub
            .events()
            .list(&self.calendar_id)
            .time_min(start)
            .time_max(end)
            .q(summary)
            .doit()
            .await
            .context("Failed to list calendar events")
            .map_err(CalendarError::Read)?;

        Ok(events.items.is_some_and(|items| !items.is_empty()))
    }

    async fn insert_event(&self, draft: &EventDraft) -> Result<Option<String>, CalendarError> {
        let event = Event {
            summary: Some(draft.summary.clone()),
            start: Some(EventDateTime {
                date_time: Some(draft.start),
                time_zone: Some(CALENDAR_TIME_ZONE.to_string()),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(draft.end),
                time_zone: Some(CALENDAR_TIME_ZONE.to_string()),
                ..Default::default()
            }),
            reminders: Some(EventReminders {
                use_default: Some(false),
                overrides: Some(vec![EventReminder {
                    method: Some("popup".to_string()),
                    minutes: Some(draft.reminder_minutes),
                }]),
            }),
            ..Default::default()
        };

        let (_, created) = self
            .hub
            .events()
            .insert(event, &self.calendar_id)
            .doit()
            .await
            .context("Failed to insert calendar event")
            .map_err(CalendarError::Write)?;

        tracing::info!(
            "Created calendar event: {} (id: {:?})",
            draft.summary,
            created.id
        );
        Ok(created.html_link)
    }
}
