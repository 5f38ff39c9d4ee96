//! Integration tests for the file-backed event log.
//!
//! These tests exercise the full open/append/reload cycle against real
//! files under the system temp directory. Each test uses a unique path so
//! runs never interfere with each other.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use resonance_store::{EventStore, StoreError};
use resonance_types::EventId;

/// Build a unique log path under the system temp directory.
fn temp_log_path(name: &str) -> PathBuf {
    let unique = format!(
        "resonance-store-{name}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    std::env::temp_dir().join(unique)
}

fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

#[test]
fn open_creates_missing_log_file() {
    let path = temp_log_path("create");
    assert!(!path.exists());

    let store = EventStore::open(&path).expect("open should create the log");
    assert!(store.is_empty());
    assert!(path.exists());
    assert_eq!(store.path(), Some(path.as_path()));

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn appended_events_survive_reload_losslessly() {
    let path = temp_log_path("reload");

    let mut attributes = BTreeMap::new();
    attributes.insert("source".to_owned(), "journal".to_owned());
    attributes.insert("session".to_owned(), "morning".to_owned());

    {
        let mut store = EventStore::open(&path).expect("open");
        store
            .append(
                ts(8, 0),
                "joy",
                attributes.clone(),
                Some("a bright morning".to_owned()),
            )
            .expect("append joy");
        store
            .append(ts(9, 30), "calm", BTreeMap::new(), None)
            .expect("append calm");
        store.close().expect("close");
    }

    let store = EventStore::open(&path).expect("reopen");
    assert_eq!(store.len(), 2);

    let events = store.read_range(ts(0, 0), ts(23, 59));
    assert_eq!(events[0].label, "joy");
    assert_eq!(events[0].attributes, attributes);
    assert_eq!(events[0].content.as_deref(), Some("a bright morning"));
    assert_eq!(events[1].label, "calm");
    assert!(events[1].attributes.is_empty());
    assert_eq!(events[1].content, None);

    // Ids are reassigned from line order on load: still monotonic.
    assert_eq!(events[0].id, EventId::new(0));
    assert_eq!(events[1].id, EventId::new(1));

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn append_continues_after_reload() {
    let path = temp_log_path("continue");

    {
        let mut store = EventStore::open(&path).expect("open");
        store
            .append(ts(8, 0), "joy", BTreeMap::new(), None)
            .expect("append");
        store.close().expect("close");
    }

    let mut store = EventStore::open(&path).expect("reopen");
    let id = store
        .append(ts(9, 0), "anger", BTreeMap::new(), None)
        .expect("append after reload");
    assert_eq!(id, EventId::new(1));
    store.close().expect("close");

    let store = EventStore::open(&path).expect("reopen again");
    assert_eq!(store.len(), 2);

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn truncated_trailing_record_is_skipped_not_fatal() {
    let path = temp_log_path("truncated");

    {
        let mut store = EventStore::open(&path).expect("open");
        store
            .append(ts(8, 0), "joy", BTreeMap::new(), None)
            .expect("append joy");
        store
            .append(ts(9, 0), "calm", BTreeMap::new(), None)
            .expect("append calm");
        store.close().expect("close");
    }

    // Simulate a crash mid-append: a half-written trailing line.
    {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("reopen raw");
        file.write_all(b"{\"timestamp\":\"2026-03-01T10:0")
            .expect("write partial line");
    }

    let store = EventStore::open(&path).expect("reload tolerates truncation");
    assert_eq!(store.len(), 2);
    let events = store.read_range(ts(0, 0), ts(23, 59));
    assert_eq!(events[0].label, "joy");
    assert_eq!(events[1].label, "calm");

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn garbage_line_is_skipped_with_history_intact() {
    let path = temp_log_path("garbage");

    fs::write(
        &path,
        "{\"timestamp\":\"2026-03-01T08:00:00Z\",\"label\":\"joy\"}\n\
         not json at all\n\
         {\"timestamp\":\"2026-03-01T09:00:00Z\",\"label\":\"calm\"}\n",
    )
    .expect("seed log file");

    let store = EventStore::open(&path).expect("open");
    assert_eq!(store.len(), 2);
    let events = store.read_range(ts(0, 0), ts(23, 59));
    assert_eq!(events[0].label, "joy");
    assert_eq!(events[1].label, "calm");

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn blank_lines_are_ignored() {
    let path = temp_log_path("blank");

    fs::write(
        &path,
        "\n{\"timestamp\":\"2026-03-01T08:00:00Z\",\"label\":\"joy\"}\n\n",
    )
    .expect("seed log file");

    let store = EventStore::open(&path).expect("open");
    assert_eq!(store.len(), 1);

    drop(store);
    let _ = fs::remove_file(&path);
}

#[test]
fn failed_validation_writes_nothing() {
    let path = temp_log_path("validation");

    {
        let mut store = EventStore::open(&path).expect("open");
        let result = store.append(ts(8, 0), "  ", BTreeMap::new(), None);
        assert!(matches!(result, Err(StoreError::Validation { .. })));
        store.close().expect("close");
    }

    let contents = fs::read_to_string(&path).expect("read log");
    assert!(contents.is_empty());

    let _ = fs::remove_file(&path);
}
