//! End-to-end scenarios through the service facade.
//!
//! Every query here uses the deterministic `*_at` forms with a fixed
//! `now`, so expected weights and groupings are exact.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};

use resonance_engine::CoordinateMapper;
use resonance_service::config::CorrelationConfig;
use resonance_service::{CorrelationService, ServiceError};
use resonance_store::EventStore;
use resonance_types::{DecayStrategy, EventId};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn in_memory_service() -> CorrelationService {
    CorrelationService::new(
        EventStore::in_memory(),
        CoordinateMapper::builtin(),
        CorrelationConfig::default(),
    )
}

/// Build a unique log path under the system temp directory.
fn temp_log_path(name: &str) -> PathBuf {
    let unique = format!(
        "resonance-service-{name}-{}-{}",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    std::env::temp_dir().join(unique)
}

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario A: linear climate over three staggered events
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_linear_climate_orders_decay_by_age() {
    let svc = in_memory_service();
    svc.ingest_at("joy", t0(), BTreeMap::new(), None).unwrap();
    svc.ingest_at("joy", t0() + Duration::hours(1), BTreeMap::new(), None)
        .unwrap();
    svc.ingest_at("joy", t0() + Duration::hours(2), BTreeMap::new(), None)
        .unwrap();

    let now = t0() + Duration::hours(2);
    let climate = svc
        .climate_at(now, Some(24.0), Some(DecayStrategy::Linear))
        .unwrap();

    // Freshest event contributes 1 + 1.0, the middle 1 + (1 - 1/24), the
    // oldest 1 + (1 - 2/24).
    let expected = 2.0 + (2.0 - 1.0 / 24.0) + (2.0 - 2.0 / 24.0);
    let joy = climate.get("joy").copied().unwrap();
    assert!((joy - expected).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Scenario B: clusters split on label and shared source
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_shared_source_groups_and_stranger_stays_alone() {
    let svc = in_memory_service();
    svc.ingest_at("A", t0(), attrs(&[("source", "x")]), None)
        .unwrap();
    svc.ingest_at(
        "A",
        t0() + Duration::minutes(1),
        attrs(&[("source", "x")]),
        None,
    )
    .unwrap();
    svc.ingest_at(
        "B",
        t0() + Duration::minutes(2),
        attrs(&[("source", "y")]),
        None,
    )
    .unwrap();

    // 5-minute grouping gap via the query window (well under the cap).
    let now = t0() + Duration::minutes(2);
    let clusters = svc.clusters_at(now, Some(5.0 / 60.0)).unwrap();

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].members, vec![EventId::new(0), EventId::new(1)]);
    assert_eq!(clusters[0].dominant_label, "A");
    assert_eq!(clusters[1].members, vec![EventId::new(2)]);
    assert_eq!(clusters[1].dominant_label, "B");

    // Partition: every ingested event appears exactly once.
    let total: usize = clusters.iter().map(resonance_types::Cluster::len).sum();
    assert_eq!(total, 3);
}

// ---------------------------------------------------------------------------
// Scenario C: alternating labels produce loops at every valid offset
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_alternating_labels_match_at_every_valid_offset() {
    let svc = in_memory_service();
    for step in 0..10_i64 {
        let label = if step % 2 == 0 { "A" } else { "B" };
        svc.ingest_at(label, t0() + Duration::minutes(step), BTreeMap::new(), None)
            .unwrap();
    }

    let now = t0() + Duration::minutes(9);
    let matches = svc.patterns_at(now, Some(1.0), Some(2), Some(5)).unwrap();

    // Length 2 repeats at starts 0..=6, length 4 at starts 0..=2; odd
    // lengths never line up on an alternating sequence.
    assert_eq!(matches.len(), 10);
    let by_length = |l: usize| matches.iter().filter(|m| m.labels.len() == l).count();
    assert_eq!(by_length(2), 7);
    assert_eq!(by_length(3), 0);
    assert_eq!(by_length(4), 3);
    assert_eq!(by_length(5), 0);

    // Each match really is a back-to-back repeat of its label sequence.
    for found in &matches {
        let l = found.labels.len();
        assert_eq!(found.end_index, found.start_index + 2 * l - 1);
    }
}

// ---------------------------------------------------------------------------
// Round-trip and persistence
// ---------------------------------------------------------------------------

#[test]
fn round_trip_preserves_label_attributes_and_content() {
    let path = temp_log_path("round-trip");
    let mut config = CorrelationConfig::default();
    config.store.path.clone_from(&path);

    let svc = CorrelationService::from_config(config.clone()).unwrap();
    let attributes = attrs(&[("source", "journal"), ("mood", "high")]);
    svc.ingest(
        "joy",
        "2026-03-01T12:00:00Z",
        attributes.clone(),
        Some("unicode content: café ☕".to_owned()),
    )
    .unwrap();
    svc.close().unwrap();

    // Reopen from disk and read back the exact timestamp.
    let reopened = CorrelationService::from_config(config).unwrap();
    let climate = reopened.climate_at(t0(), Some(1.0), None).unwrap();
    assert!(climate.contains_key("joy"));

    let store = EventStore::open(&path).unwrap();
    let events = store.read_range(t0(), t0());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label, "joy");
    assert_eq!(events[0].attributes, attributes);
    assert_eq!(events[0].content.as_deref(), Some("unicode content: café ☕"));

    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Boundaries and errors
// ---------------------------------------------------------------------------

#[test]
fn empty_service_answers_every_query_safely() {
    let svc = in_memory_service();
    assert!(svc.climate_at(t0(), None, None).unwrap().is_empty());
    assert!(svc.clusters_at(t0(), None).unwrap().is_empty());
    assert!(svc.patterns_at(t0(), None, None, None).unwrap().is_empty());
    let vector = svc.dominant_vector_at(t0(), None).unwrap();
    assert!(vector.x.abs() < 1e-9);
    assert!(vector.magnitude.abs() < 1e-9);
}

#[test]
fn rejected_ingestion_leaves_the_log_empty() {
    let svc = in_memory_service();
    assert!(matches!(
        svc.ingest("", "2026-03-01T12:00:00Z", BTreeMap::new(), None),
        Err(ServiceError::Validation { .. })
    ));
    assert!(matches!(
        svc.ingest("joy", "not-a-timestamp", BTreeMap::new(), None),
        Err(ServiceError::Validation { .. })
    ));
    assert!(svc.is_empty().unwrap());
}

#[test]
fn dominant_vector_averages_known_coordinates() {
    let svc = in_memory_service();
    svc.ingest_at("joy", t0(), BTreeMap::new(), None).unwrap();
    svc.ingest_at("joy", t0(), BTreeMap::new(), None).unwrap();

    let vector = svc.dominant_vector_at(t0(), Some(24.0)).unwrap();
    let mapper = CoordinateMapper::builtin();
    let joy = mapper.coordinates("joy");
    assert!((vector.x - joy.x).abs() < 1e-9);
    assert!((vector.y - joy.y).abs() < 1e-9);
    assert!((vector.magnitude - 0.2).abs() < 1e-9);
}

#[test]
fn unknown_labels_still_count_toward_magnitude() {
    let svc = in_memory_service();
    svc.ingest_at("label-with-no-coordinates", t0(), BTreeMap::new(), None)
        .unwrap();

    let vector = svc.dominant_vector_at(t0(), Some(24.0)).unwrap();
    assert!(vector.x.abs() < 1e-9);
    assert!(vector.y.abs() < 1e-9);
    assert!((vector.magnitude - 0.1).abs() < 1e-9);
}

#[test]
fn pattern_window_narrows_the_searched_history() {
    let svc = in_memory_service();
    // Old repeat far outside the window, fresh repeat inside it.
    for step in 0..2_i64 {
        svc.ingest_at(
            "old",
            t0() - Duration::hours(48) + Duration::minutes(step),
            BTreeMap::new(),
            None,
        )
        .unwrap();
    }
    for step in 0..2_i64 {
        svc.ingest_at("fresh", t0() + Duration::minutes(step), BTreeMap::new(), None)
            .unwrap();
    }

    let now = t0() + Duration::minutes(1);
    let matches = svc.patterns_at(now, Some(24.0), Some(1), Some(5)).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].labels, vec!["fresh".to_owned()]);
}
