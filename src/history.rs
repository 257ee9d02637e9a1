//! Freshness gate and history updater for the cached index record
//!
//! This is the heart of the proxy: given a possibly-stale cached record,
//! `decide` determines whether it can be served as-is, and `refresh` derives
//! the next record by appending one freshly fetched sample and trimming the
//! series to the most recent [`MAX_DAYS`] entries. Both functions are pure
//! with respect to the record store so they can be tested without one.

use std::future::Future;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// Maximum number of daily samples retained in a record
pub const MAX_DAYS: usize = 30;

/// The cached record, serialized as the exact JSON shape served to clients
///
/// `historical_values` and `historical_dates` are parallel sequences, oldest
/// first. Date labels are display strings derived from the instant each
/// sample was taken; they are appended once and never recomputed. Records
/// written by earlier versions may lack the series fields entirely, so both
/// deserialize as empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Moment this record was produced
    pub timestamp: DateTime<Utc>,
    /// Daily index values, oldest first, at most [`MAX_DAYS`] entries
    #[serde(default)]
    pub historical_values: Vec<f64>,
    /// Display labels parallel to `historical_values` (e.g. "Jul 20")
    #[serde(default)]
    pub historical_dates: Vec<String>,
}

/// Outcome of the freshness decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The cached record was produced on the current calendar day; serve it
    /// unchanged
    Fresh,
    /// No cached record, or it is from an earlier calendar day; refresh
    Stale,
}

/// Returns true when both instants fall on the same calendar day, with the
/// day boundary defined by the given UTC offset
pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: FixedOffset) -> bool {
    a.with_timezone(&tz).date_naive() == b.with_timezone(&tz).date_naive()
}

/// Renders the short month+day label for a sample taken at `instant`
pub fn date_label(instant: DateTime<Utc>, tz: FixedOffset) -> String {
    instant.with_timezone(&tz).format("%b %-d").to_string()
}

/// Decides whether a cached record can be served as-is
///
/// Absent records are always stale. Otherwise the record's timestamp and
/// `now` are compared at calendar-day granularity under `tz`. Pure decision;
/// no side effects.
pub fn decide(record: Option<&HistoryRecord>, now: DateTime<Utc>, tz: FixedOffset) -> Freshness {
    match record {
        Some(record) if same_calendar_day(record.timestamp, now, tz) => Freshness::Fresh,
        _ => Freshness::Stale,
    }
}

/// Fetches one sample and derives the next record from `prior`
///
/// `fetch_sample` is invoked exactly once; its error propagates unchanged and
/// leaves `prior` untouched, so a failed refresh never loses history. On
/// success the sample and its date label are appended and the series is
/// trimmed from the front to keep the most recent `max_days` entries.
///
/// The returned record is not persisted here; the caller owns the store
/// write.
pub async fn refresh<F, Fut>(
    prior: Option<&HistoryRecord>,
    now: DateTime<Utc>,
    tz: FixedOffset,
    max_days: usize,
    fetch_sample: F,
) -> Result<HistoryRecord, ProxyError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<f64, ProxyError>>,
{
    let mut values = prior
        .map(|record| record.historical_values.clone())
        .unwrap_or_default();
    let mut dates = prior
        .map(|record| record.historical_dates.clone())
        .unwrap_or_default();

    let value = fetch_sample().await?;

    values.push(value);
    dates.push(date_label(now, tz));

    // Suffix-keep: drop from the front until at most max_days remain.
    if values.len() > max_days {
        values.drain(..values.len() - max_days);
    }
    if dates.len() > max_days {
        dates.drain(..dates.len() - max_days);
    }

    Ok(HistoryRecord {
        timestamp: now,
        historical_values: values,
        historical_dates: dates,
    })
}
