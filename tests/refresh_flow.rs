//! End-to-end refresh-cycle tests
//!
//! Exercises the gate, refresh and store sequence the HTTP handler performs,
//! using a temp-dir file store and stub fetch closures in place of the
//! downstream API. The updater is pure with respect to the store, which is
//! what makes these scenarios testable without HTTP.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use tempfile::TempDir;

use fngproxy::cache::{FileStore, RecordStore};
use fngproxy::config::{CACHE_KEY, CACHE_TTL_SECS};
use fngproxy::error::ProxyError;
use fngproxy::history::{self, Freshness, HistoryRecord, MAX_DAYS};

fn utc() -> FixedOffset {
    Utc.fix()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn create_test_store() -> (FileStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileStore::with_dir(temp_dir.path().to_path_buf());
    (store, temp_dir)
}

#[tokio::test]
async fn test_first_request_populates_the_store() {
    let (store, _temp_dir) = create_test_store();
    let now = at(2026, 7, 1, 15);

    // Empty store: the gate must demand a refresh.
    let prior = store.read(CACHE_KEY).await.expect("read");
    assert!(prior.is_none());
    assert_eq!(history::decide(prior.as_ref(), now, utc()), Freshness::Stale);

    let record = history::refresh(prior.as_ref(), now, utc(), MAX_DAYS, || async { Ok(42.0) })
        .await
        .expect("refresh");
    assert_eq!(record.historical_values, vec![42.0]);
    assert_eq!(record.historical_dates, vec!["Jul 1"]);

    store
        .write(CACHE_KEY, &record, CACHE_TTL_SECS)
        .await
        .expect("write");
    let reread = store.read(CACHE_KEY).await.expect("read").expect("entry");
    assert_eq!(reread, record);
}

#[tokio::test]
async fn test_same_day_second_request_is_fresh() {
    let (store, _temp_dir) = create_test_store();
    let morning = at(2026, 7, 1, 9);
    let evening = at(2026, 7, 1, 21);

    let record = history::refresh(None, morning, utc(), MAX_DAYS, || async { Ok(42.0) })
        .await
        .expect("refresh");
    store
        .write(CACHE_KEY, &record, CACHE_TTL_SECS)
        .await
        .expect("write");

    // Later the same day the stored record is served unchanged.
    let cached = store.read(CACHE_KEY).await.expect("read");
    assert_eq!(
        history::decide(cached.as_ref(), evening, utc()),
        Freshness::Fresh
    );
    assert_eq!(cached.expect("entry"), record);
}

#[tokio::test]
async fn test_next_day_refresh_extends_the_series() {
    let (store, _temp_dir) = create_test_store();
    let day_one = at(2026, 7, 1, 12);
    let day_two = at(2026, 7, 2, 12);

    let first = history::refresh(None, day_one, utc(), MAX_DAYS, || async { Ok(42.0) })
        .await
        .expect("refresh");
    store
        .write(CACHE_KEY, &first, CACHE_TTL_SECS)
        .await
        .expect("write");

    let prior = store.read(CACHE_KEY).await.expect("read");
    assert_eq!(history::decide(prior.as_ref(), day_two, utc()), Freshness::Stale);

    let second = history::refresh(prior.as_ref(), day_two, utc(), MAX_DAYS, || async { Ok(38.5) })
        .await
        .expect("refresh");
    store
        .write(CACHE_KEY, &second, CACHE_TTL_SECS)
        .await
        .expect("write");

    let reread = store.read(CACHE_KEY).await.expect("read").expect("entry");
    assert_eq!(reread.historical_values, vec![42.0, 38.5]);
    assert_eq!(reread.historical_dates, vec!["Jul 1", "Jul 2"]);
    assert_eq!(reread.timestamp, day_two);
}

#[tokio::test]
async fn test_full_window_stays_bounded_across_the_store() {
    let (store, _temp_dir) = create_test_store();

    let full = HistoryRecord {
        timestamp: at(2026, 6, 30, 12),
        historical_values: (1..=30).map(f64::from).collect(),
        historical_dates: (1..=30).map(|d| format!("Jun {d}")).collect(),
    };
    store
        .write(CACHE_KEY, &full, CACHE_TTL_SECS)
        .await
        .expect("write");

    let prior = store.read(CACHE_KEY).await.expect("read");
    let record = history::refresh(prior.as_ref(), at(2026, 7, 1, 12), utc(), MAX_DAYS, || async {
        Ok(31.0)
    })
    .await
    .expect("refresh");

    assert_eq!(record.historical_values.len(), MAX_DAYS);
    assert_eq!(record.historical_values.first(), Some(&2.0));
    assert_eq!(record.historical_values.last(), Some(&31.0));
    assert_eq!(record.historical_dates.first().map(String::as_str), Some("Jun 2"));
    assert_eq!(record.historical_dates.last().map(String::as_str), Some("Jul 1"));
}

#[tokio::test]
async fn test_failed_fetch_leaves_the_store_untouched() {
    let (store, _temp_dir) = create_test_store();
    let yesterday = at(2026, 7, 1, 12);
    let today = at(2026, 7, 2, 12);

    let old = history::refresh(None, yesterday, utc(), MAX_DAYS, || async { Ok(42.0) })
        .await
        .expect("refresh");
    store
        .write(CACHE_KEY, &old, CACHE_TTL_SECS)
        .await
        .expect("write");

    // Downstream answers 503: the refresh errors and nothing is written.
    let prior = store.read(CACHE_KEY).await.expect("read");
    let result = history::refresh(prior.as_ref(), today, utc(), MAX_DAYS, || async {
        Err(ProxyError::DownstreamStatus(503))
    })
    .await;
    assert!(matches!(result, Err(ProxyError::DownstreamStatus(503))));

    // A subsequent request still sees the old record and evaluates
    // freshness against it: stale today, fresh relative to yesterday.
    let cached = store.read(CACHE_KEY).await.expect("read");
    assert_eq!(cached.as_ref(), Some(&old));
    assert_eq!(history::decide(cached.as_ref(), today, utc()), Freshness::Stale);
    assert_eq!(
        history::decide(cached.as_ref(), yesterday, utc()),
        Freshness::Fresh
    );
}

#[tokio::test]
async fn test_malformed_payload_aborts_without_mutation() {
    let (store, _temp_dir) = create_test_store();

    let result = history::refresh(None, at(2026, 7, 2, 12), utc(), MAX_DAYS, || async {
        Err(ProxyError::MalformedPayload("expected a JSON array".to_string()))
    })
    .await;
    assert!(matches!(result, Err(ProxyError::MalformedPayload(_))));

    assert!(store.read(CACHE_KEY).await.expect("read").is_none());
}

#[tokio::test]
async fn test_partial_legacy_record_is_extended_not_rejected() {
    let (store, _temp_dir) = create_test_store();

    // A record written without series fields deserializes with empty
    // sequences and refresh builds on top of it.
    let legacy = HistoryRecord {
        timestamp: at(2026, 7, 1, 12),
        historical_values: Vec::new(),
        historical_dates: Vec::new(),
    };
    store
        .write(CACHE_KEY, &legacy, CACHE_TTL_SECS)
        .await
        .expect("write");

    let prior = store.read(CACHE_KEY).await.expect("read");
    let record = history::refresh(prior.as_ref(), at(2026, 7, 2, 12), utc(), MAX_DAYS, || async {
        Ok(47.0)
    })
    .await
    .expect("refresh");

    assert_eq!(record.historical_values, vec![47.0]);
    assert_eq!(record.historical_dates, vec!["Jul 2"]);
}
