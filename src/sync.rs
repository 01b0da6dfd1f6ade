//! Per-shift reconciliation against the calendar.

use chrono::{DateTime, Utc};

use crate::calendar_client::{CalendarApi, CalendarError};
use crate::sling_client::ShiftRecord;

/// Popup reminder lead time applied to every synced event.
pub const REMINDER_MINUTES: i32 = 30;

/// Transient event representation handed to the calendar. Built per shift,
/// used once, discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reminder_minutes: i32,
}

/// What happened to a single shift.
#[derive(Debug)]
pub enum SyncOutcome {
    Created { link: Option<String> },
    SkippedDuplicate,
    Failed(CalendarError),
}

pub fn build_draft(shift: &ShiftRecord, label: &str) -> EventDraft {
    EventDraft {
        summary: label.to_string(),
        start: shift.start,
        end: shift.end,
        reminder_minutes: REMINDER_MINUTES,
    }
}

/// Reconcile one shift against the calendar: skip when an event matching
/// the label already overlaps the shift window, insert otherwise.
///
/// The existence check always precedes the insert, and the insert result
/// is awaited before any status is reported. Failures come back as a
/// tagged outcome; nothing is raised past this function.
pub async fn sync_shift<C: CalendarApi>(
    calendar: &C,
    shift: &ShiftRecord,
    label: &str,
) -> SyncOutcome {
    match calendar
        .has_matching_event(label, shift.start, shift.end)
        .await
    {
        Ok(true) => SyncOutcome::SkippedDuplicate,
        Ok(false) => {
            let draft = build_draft(shift, label);
            match calendar.insert_event(&draft).await {
                Ok(link) => SyncOutcome::Created { link },
                Err(e) => SyncOutcome::Failed(e),
            }
        }
        Err(e) => SyncOutcome::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory calendar: matching is (summary, overlapping window), the
    /// same dedup key the real list query uses.
    #[derive(Default, Clone)]
    struct MockCalendar {
        events: Arc<Mutex<Vec<EventDraft>>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl CalendarApi for MockCalendar {
        async fn has_matching_event(
            &self,
            summary: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<bool, CalendarError> {
            if self.fail_reads {
                return Err(CalendarError::Read(anyhow::anyhow!("list failed")));
            }
            let events = self.events.lock().unwrap();
            Ok(events
                .iter()
                .any(|e| e.summary == summary && e.start <= end && e.end >= start))
        }

        async fn insert_event(
            &self,
            draft: &EventDraft,
        ) -> Result<Option<String>, CalendarError> {
            if self.fail_writes {
                return Err(CalendarError::Write(anyhow::anyhow!("insert failed")));
            }
            self.events.lock().unwrap().push(draft.clone());
            Ok(Some("https://calendar.example/event/1".to_string()))
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn sample_shift() -> ShiftRecord {
        ShiftRecord {
            start: ts("2024-01-02T09:00:00Z"),
            end: ts("2024-01-02T17:00:00Z"),
            position_id: 1710948,
        }
    }

    #[tokio::test]
    async fn test_sync_creates_then_skips() {
        let calendar = MockCalendar::default();
        let shift = sample_shift();

        let first = sync_shift(&calendar, &shift, "Front Desk").await;
        assert!(matches!(first, SyncOutcome::Created { link: Some(_) }));

        let second = sync_shift(&calendar, &shift, "Front Desk").await;
        assert!(matches!(second, SyncOutcome::SkippedDuplicate));

        assert_eq!(calendar.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_window_different_label_still_creates() {
        let calendar = MockCalendar::default();
        let shift = sample_shift();

        sync_shift(&calendar, &shift, "Front Desk").await;
        let outcome = sync_shift(&calendar, &shift, "Check In Desk").await;

        assert!(matches!(outcome, SyncOutcome::Created { .. }));
        assert_eq!(calendar.events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_read_failure_reports_failed() {
        let calendar = MockCalendar {
            fail_reads: true,
            ..Default::default()
        };

        let outcome = sync_shift(&calendar, &sample_shift(), "Front Desk").await;

        assert!(matches!(
            outcome,
            SyncOutcome::Failed(CalendarError::Read(_))
        ));
        // A failed dedup check must not fall through to an insert.
        assert!(calendar.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_reports_failed() {
        let calendar = MockCalendar {
            fail_writes: true,
            ..Default::default()
        };

        let outcome = sync_shift(&calendar, &sample_shift(), "Front Desk").await;

        assert!(matches!(
            outcome,
            SyncOutcome::Failed(CalendarError::Write(_))
        ));
    }

    #[test]
    fn test_draft_carries_reminder_policy() {
        let shift = sample_shift();
        let draft = build_draft(&shift, "Front Desk");

        assert_eq!(draft.summary, "Front Desk");
        assert_eq!(draft.start, shift.start);
        assert_eq!(draft.end, shift.end);
        assert_eq!(draft.reminder_minutes, REMINDER_MINUTES);
    }
}
