//! Tests for the session cache and snapshot validation.

use blackout_engine::cache::{decode_snapshot, encode_snapshot};
use blackout_engine::{BlackoutError, DateInterval, FileCache, MemoryCache, SessionCache};
use chrono::NaiveDate;

fn range(start: (u32, u32), end: (u32, u32)) -> DateInterval {
    DateInterval::new(
        NaiveDate::from_ymd_opt(2024, start.0, start.1).unwrap(),
        NaiveDate::from_ymd_opt(2024, end.0, end.1).unwrap(),
    )
    .unwrap()
}

// ── Snapshot format ─────────────────────────────────────────────────────────

#[test]
fn snapshot_uses_iso_days() {
    let raw = encode_snapshot(&[range((1, 1), (1, 3))]).unwrap();
    assert_eq!(raw, r#"[{"startDate":"2024-01-01","endDate":"2024-01-03"}]"#);
}

#[test]
fn snapshot_decodes_into_store() {
    let intervals = vec![range((1, 1), (1, 3)), range((2, 1), (2, 1))];
    let store = decode_snapshot(&encode_snapshot(&intervals).unwrap()).unwrap();
    assert_eq!(store.as_slice(), intervals.as_slice());
}

#[test]
fn snapshot_that_is_not_json_is_malformed() {
    assert!(matches!(
        decode_snapshot("not json"),
        Err(BlackoutError::MalformedCacheData(_))
    ));
}

#[test]
fn snapshot_with_wrong_shape_is_malformed() {
    assert!(matches!(
        decode_snapshot(r#"{"startDate":"2024-01-01","endDate":"2024-01-03"}"#),
        Err(BlackoutError::MalformedCacheData(_))
    ));
}

#[test]
fn snapshot_with_unparsable_date_is_malformed() {
    assert!(matches!(
        decode_snapshot(r#"[{"startDate":"Mon Jan 01 2024","endDate":"2024-01-03"}]"#),
        Err(BlackoutError::MalformedCacheData(_))
    ));
}

#[test]
fn snapshot_with_reversed_interval_is_malformed() {
    assert!(matches!(
        decode_snapshot(r#"[{"startDate":"2024-01-05","endDate":"2024-01-03"}]"#),
        Err(BlackoutError::MalformedCacheData(_))
    ));
}

#[test]
fn snapshot_with_overlapping_intervals_is_malformed() {
    let raw = r#"[
        {"startDate":"2024-01-01","endDate":"2024-01-05"},
        {"startDate":"2024-01-05","endDate":"2024-01-08"}
    ]"#;
    assert!(matches!(
        decode_snapshot(raw),
        Err(BlackoutError::MalformedCacheData(_))
    ));
}

// ── Backing stores ──────────────────────────────────────────────────────────

#[test]
fn memory_cache_round_trips_entries() {
    let mut cache = MemoryCache::new();
    assert_eq!(cache.load("k").unwrap(), None);

    cache.store("k", "v").unwrap();
    assert_eq!(cache.load("k").unwrap().as_deref(), Some("v"));

    cache.remove("k").unwrap();
    cache.remove("k").unwrap();
    assert_eq!(cache.load("k").unwrap(), None);
}

#[test]
fn file_cache_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileCache::new(dir.path().join("nested"));
    cache.store("blackout.unavailable-dates", "[]").unwrap();

    let reopened = FileCache::new(dir.path().join("nested"));
    assert_eq!(
        reopened.load("blackout.unavailable-dates").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn file_cache_keys_cannot_escape_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileCache::new(dir.path());
    cache.store("../outside/key", "x").unwrap();

    assert!(!dir.path().join("../outside").exists());
    assert_eq!(cache.load("../outside/key").unwrap().as_deref(), Some("x"));
}

#[test]
fn file_cache_remove_missing_key_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = FileCache::new(dir.path());
    cache.remove("never-written").unwrap();
    assert_eq!(cache.load("never-written").unwrap(), None);
}
