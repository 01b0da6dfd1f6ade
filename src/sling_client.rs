//! Sling API client and shift chain retrieval.
//!
//! The Sling API exposes upcoming shifts one at a time: each request asks
//! for the next shift at or after a reference time, and each accepted
//! shift's end time anchors the following request.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;

/// Raw `next shift` response from the Sling API.
#[derive(Debug, Clone, Deserialize)]
pub struct NextShift {
    pub dtstart: Option<DateTime<Utc>>,
    pub dtend: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: Option<PositionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionRef {
    pub id: Option<i64>,
}

/// A shift that passed validation and was appended to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub position_id: i64,
}

/// Why chain retrieval stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEnd {
    /// The source returned a record without a usable start, end, or
    /// position id. Normal end of data.
    Exhausted,
    /// A request failed; the chain holds everything fetched before the error.
    SourceError(String),
    /// The next shift ended past the lookahead horizon.
    HorizonReached,
    /// The maximum chain length was hit.
    LengthCapped,
}

/// Ordered shifts plus the reason retrieval stopped.
#[derive(Debug, Clone)]
pub struct ShiftChain {
    pub shifts: Vec<ShiftRecord>,
    pub end: ChainEnd,
}

/// Bounds on a single chain fetch. The upstream service is the only thing
/// that terminates the walk otherwise, so both bounds are load-bearing.
#[derive(Debug, Clone, Copy)]
pub struct ChainLimits {
    pub max_len: usize,
    pub lookahead_days: i64,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            max_len: 100,
            lookahead_days: 60,
        }
    }
}

/// Anything that can answer "what is the next shift at or after this time".
#[allow(async_fn_in_trait)]
pub trait ShiftSource {
    async fn next_shift(&self, after: DateTime<Utc>) -> Result<NextShift>;
}

/// HTTP client for the Sling API.
pub struct SlingClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SlingClient {
    pub fn new(token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }
}

impl ShiftSource for SlingClient {
    async fn next_shift(&self, after: DateTime<Utc>) -> Result<NextShift> {
        let response = self
            .http
            .get(format!("{}/shifts/next", self.base_url))
            // Sling tokens are sent bare, without a Bearer prefix
            .header(reqwest::header::AUTHORIZATION, self.token.as_str())
            .query(&[(
                "referenceDate",
                after.to_rfc3339_opts(SecondsFormat::Secs, true),
            )])
            .send()
            .await
            .context("Sling request failed")?
            .error_for_status()
            .context("Sling returned an error status")?;

        response
            .json()
            .await
            .context("Failed to parse Sling response")
    }
}

/// Walk the shift chain forward from `reference`.
///
/// Each accepted shift's end time anchors the next request. A request
/// failure truncates the chain instead of discarding it, so shifts already
/// confirmed survive a transient outage. No retries within a single walk.
pub async fn fetch_chain<S: ShiftSource>(
    source: &S,
    reference: DateTime<Utc>,
    limits: ChainLimits,
) -> ShiftChain {
    let horizon = reference + Duration::days(limits.lookahead_days);
    let mut shifts: Vec<ShiftRecord> = Vec::new();
    let mut cursor = reference;

    loop {
        if shifts.len() >= limits.max_len {
            tracing::warn!("Shift chain hit the maximum length ({})", limits.max_len);
            return ShiftChain {
                shifts,
                end: ChainEnd::LengthCapped,
            };
        }

        let next = match source.next_shift(cursor).await {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(
                    "Shift chain truncated after {} shifts: {:#}",
                    shifts.len(),
                    e
                );
                return ShiftChain {
                    shifts,
                    end: ChainEnd::SourceError(format!("{e:#}")),
                };
            }
        };

        let (Some(start), Some(end), Some(position_id)) = (
            next.dtstart,
            next.dtend,
            next.position.and_then(|p| p.id),
        ) else {
            return ShiftChain {
                shifts,
                end: ChainEnd::Exhausted,
            };
        };

        if end > horizon {
            tracing::debug!("Next shift ends {} -- past the lookahead horizon", end);
            return ShiftChain {
                shifts,
                end: ChainEnd::HorizonReached,
            };
        }

        shifts.push(ShiftRecord {
            start,
            end,
            position_id,
        });
        cursor = end;
    }
}
