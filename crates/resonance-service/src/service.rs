//! The correlation service facade.
//!
//! One [`CorrelationService`] instance owns the event log for its process:
//! ingestion goes through a single write lock, queries take a read-locked
//! snapshot of the lookback window and then run the pure engine functions
//! on it with the lock already released. There is no other shared state,
//! so concurrent queries never contend with each other.
//!
//! Every query has two forms: the plain one stamps `now` from the wall
//! clock, and a `*_at` variant takes `now` as an argument so embedders and
//! tests get deterministic results.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use resonance_engine::CoordinateMapper;
use resonance_store::EventStore;
use resonance_types::{Cluster, DecayStrategy, DominantVector, Event, EventId, PatternMatch};

use crate::config::CorrelationConfig;
use crate::error::ServiceError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Ingestion and query facade over one event log.
#[derive(Debug)]
pub struct CorrelationService {
    store: RwLock<EventStore>,
    mapper: CoordinateMapper,
    config: CorrelationConfig,
}

impl CorrelationService {
    /// Assemble a service from explicit parts.
    pub const fn new(
        store: EventStore,
        mapper: CoordinateMapper,
        config: CorrelationConfig,
    ) -> Self {
        Self {
            store: RwLock::new(store),
            mapper,
            config,
        }
    }

    /// Open the configured event log and coordinate table.
    ///
    /// A configured coordinate asset that fails to load is logged and
    /// replaced by the builtin table rather than aborting startup.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the event log cannot be
    /// opened.
    pub fn from_config(config: CorrelationConfig) -> Result<Self, ServiceError> {
        let store = EventStore::open(&config.store.path)?;
        let mapper = config.coordinates.path.as_ref().map_or_else(
            CoordinateMapper::builtin,
            |path| match CoordinateMapper::from_file(path) {
                Ok(mapper) => mapper,
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "coordinate table failed to load, using builtin"
                    );
                    CoordinateMapper::builtin()
                }
            },
        );
        Ok(Self::new(store, mapper, config))
    }

    /// The active configuration.
    pub const fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Ingest one event from untyped boundary input.
    ///
    /// The timestamp must be RFC 3339; it is normalized to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty label or an
    /// unparsable timestamp, [`ServiceError::Storage`] when the append
    /// fails.
    pub fn ingest(
        &self,
        label: &str,
        timestamp: &str,
        attributes: BTreeMap<String, String>,
        content: Option<String>,
    ) -> Result<EventId, ServiceError> {
        let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|error| {
            ServiceError::validation(format!("timestamp is not RFC 3339: {error}"))
        })?;
        self.ingest_at(label, parsed.with_timezone(&Utc), attributes, content)
    }

    /// Ingest one event with an already-typed timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty label,
    /// [`ServiceError::Storage`] when the append fails.
    pub fn ingest_at(
        &self,
        label: &str,
        timestamp: DateTime<Utc>,
        attributes: BTreeMap<String, String>,
        content: Option<String>,
    ) -> Result<EventId, ServiceError> {
        if label.trim().is_empty() {
            return Err(ServiceError::validation("label must not be empty"));
        }
        let mut store = self.store.write().map_err(|_| ServiceError::LockPoisoned)?;
        let id = store.append(timestamp, label, attributes, content)?;
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Decay-weighted counts per label over the lookback window, as of now.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn query_climate(
        &self,
        window_hours: Option<f64>,
        strategy: Option<DecayStrategy>,
    ) -> Result<BTreeMap<String, f64>, ServiceError> {
        self.climate_at(Utc::now(), window_hours, strategy)
    }

    /// Deterministic form of [`query_climate`](Self::query_climate).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn climate_at(
        &self,
        now: DateTime<Utc>,
        window_hours: Option<f64>,
        strategy: Option<DecayStrategy>,
    ) -> Result<BTreeMap<String, f64>, ServiceError> {
        let window = window_hours.unwrap_or(self.config.query.default_window_hours);
        let strategy = strategy.unwrap_or(self.config.query.decay);
        let snapshot = self.windowed(now, window)?;
        Ok(resonance_engine::climate(&snapshot, now, window, strategy))
    }

    /// Centroid of the windowed events in coordinate space, as of now.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn query_dominant_vector(
        &self,
        window_hours: Option<f64>,
    ) -> Result<DominantVector, ServiceError> {
        self.dominant_vector_at(Utc::now(), window_hours)
    }

    /// Deterministic form of
    /// [`query_dominant_vector`](Self::query_dominant_vector).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn dominant_vector_at(
        &self,
        now: DateTime<Utc>,
        window_hours: Option<f64>,
    ) -> Result<DominantVector, ServiceError> {
        let window = window_hours.unwrap_or(self.config.query.default_window_hours);
        let snapshot = self.windowed(now, window)?;
        Ok(resonance_engine::dominant_vector(
            &snapshot,
            now,
            window,
            &self.mapper,
            self.config.query.normalization,
        ))
    }

    /// Session clusters over the lookback window, as of now.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn query_clusters(&self, window_hours: Option<f64>) -> Result<Vec<Cluster>, ServiceError> {
        self.clusters_at(Utc::now(), window_hours)
    }

    /// Deterministic form of [`query_clusters`](Self::query_clusters).
    ///
    /// The grouping gap is the lookback window capped at the configured
    /// `clusters.max_window_hours`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window.
    pub fn clusters_at(
        &self,
        now: DateTime<Utc>,
        window_hours: Option<f64>,
    ) -> Result<Vec<Cluster>, ServiceError> {
        let window = window_hours.unwrap_or(self.config.query.default_window_hours);
        let snapshot = self.windowed(now, window)?;
        let gap = window.min(self.config.clusters.max_window_hours);
        Ok(resonance_engine::clusters(&snapshot, hours_to_duration(gap)))
    }

    /// Immediately repeated label sequences in the window, as of now.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window or
    /// inconsistent length bounds.
    pub fn query_patterns(
        &self,
        window_hours: Option<f64>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Result<Vec<PatternMatch>, ServiceError> {
        self.patterns_at(Utc::now(), window_hours, min_length, max_length)
    }

    /// Deterministic form of [`query_patterns`](Self::query_patterns).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Query`] for an invalid window or
    /// inconsistent length bounds.
    pub fn patterns_at(
        &self,
        now: DateTime<Utc>,
        window_hours: Option<f64>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> Result<Vec<PatternMatch>, ServiceError> {
        let window = window_hours.unwrap_or(self.config.query.default_window_hours);
        let min_length = min_length.unwrap_or(self.config.patterns.min_length);
        let max_length = max_length.unwrap_or(self.config.patterns.max_length);
        resonance_engine::validate_pattern_bounds(min_length, max_length)?;
        let snapshot = self.windowed(now, window)?;
        Ok(resonance_engine::detect_loops(
            &snapshot, min_length, max_length,
        ))
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Number of events in the log.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize, ServiceError> {
        let store = self.store.read().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(store.len())
    }

    /// Whether the log holds no events.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, ServiceError> {
        let store = self.store.read().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(store.is_empty())
    }

    /// Flush buffered log writes to disk.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the flush fails.
    pub fn flush(&self) -> Result<(), ServiceError> {
        let mut store = self.store.write().map_err(|_| ServiceError::LockPoisoned)?;
        store.flush()?;
        Ok(())
    }

    /// Flush and tear the service down.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the final flush fails.
    pub fn close(self) -> Result<(), ServiceError> {
        let store = self
            .store
            .into_inner()
            .map_err(|_| ServiceError::LockPoisoned)?;
        store.close()?;
        Ok(())
    }

    /// Snapshot the events inside `[now - window, now]`, validated and
    /// read-locked only for the duration of the copy.
    fn windowed(&self, now: DateTime<Utc>, window_hours: f64) -> Result<Vec<Event>, ServiceError> {
        resonance_engine::validate_window(window_hours)?;
        let start = now
            .checked_sub_signed(hours_to_duration(window_hours))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let store = self.store.read().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(store.read_range(start, now))
    }
}

/// Convert a non-negative hour count to a `chrono` duration at millisecond
/// resolution.
#[allow(clippy::cast_possible_truncation)]
fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours.max(0.0) * MILLIS_PER_HOUR).round() as i64)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn service() -> CorrelationService {
        CorrelationService::new(
            EventStore::in_memory(),
            CoordinateMapper::builtin(),
            CorrelationConfig::default(),
        )
    }

    #[test]
    fn ingest_parses_rfc3339_and_normalizes_to_utc() {
        let svc = service();
        let id = svc.ingest("joy", "2026-03-01T13:00:00+01:00", BTreeMap::new(), None);
        assert!(id.is_ok());

        // The +01:00 offset lands the event at 12:00 UTC.
        let climate = svc
            .climate_at(base_time(), Some(1.0), None)
            .unwrap_or_default();
        assert!((climate.get("joy").copied().unwrap_or_default() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ingest_rejects_bad_timestamp() {
        let svc = service();
        let result = svc.ingest("joy", "yesterday at noon", BTreeMap::new(), None);
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[test]
    fn ingest_rejects_empty_label() {
        let svc = service();
        let result = svc.ingest_at("   ", base_time(), BTreeMap::new(), None);
        assert!(matches!(result, Err(ServiceError::Validation { .. })));
        assert_eq!(svc.len().unwrap(), 0);
    }

    #[test]
    fn queries_fall_back_to_config_defaults() {
        let svc = service();
        svc.ingest_at("joy", base_time(), BTreeMap::new(), None)
            .unwrap();

        // Default window (24 h) covers the event.
        let climate = svc.climate_at(base_time(), None, None).unwrap();
        assert!(climate.contains_key("joy"));
    }

    #[test]
    fn invalid_window_is_a_query_error() {
        let svc = service();
        for window in [0.0, -1.0, f64::NAN] {
            let result = svc.climate_at(base_time(), Some(window), None);
            assert!(matches!(result, Err(ServiceError::Query(_))));
        }
    }

    #[test]
    fn invalid_pattern_bounds_are_a_query_error() {
        let svc = service();
        let result = svc.patterns_at(base_time(), None, Some(0), Some(10));
        assert!(matches!(result, Err(ServiceError::Query(_))));
        let result = svc.patterns_at(base_time(), None, Some(5), Some(4));
        assert!(matches!(result, Err(ServiceError::Query(_))));
    }

    #[test]
    fn queries_on_empty_log_return_empty_results() {
        let svc = service();
        assert!(svc.climate_at(base_time(), None, None).unwrap().is_empty());
        assert!(svc.clusters_at(base_time(), None).unwrap().is_empty());
        assert!(svc
            .patterns_at(base_time(), None, None, None)
            .unwrap()
            .is_empty());
        assert_eq!(
            svc.dominant_vector_at(base_time(), None).unwrap(),
            DominantVector::ZERO
        );
    }

    #[test]
    fn window_excludes_older_events() {
        let svc = service();
        svc.ingest_at("old", base_time() - Duration::hours(30), BTreeMap::new(), None)
            .unwrap();
        svc.ingest_at("fresh", base_time(), BTreeMap::new(), None)
            .unwrap();

        let climate = svc.climate_at(base_time(), Some(24.0), None).unwrap();
        assert!(!climate.contains_key("old"));
        assert!(climate.contains_key("fresh"));
    }

    #[test]
    fn cluster_gap_is_capped_by_config() {
        let mut config = CorrelationConfig::default();
        config.clusters.max_window_hours = 1.0;
        let svc = CorrelationService::new(
            EventStore::in_memory(),
            CoordinateMapper::builtin(),
            config,
        );

        // Two same-label events 2 h apart: inside a 24 h query window but
        // farther apart than the 1 h gap cap, so they split.
        svc.ingest_at("joy", base_time() - Duration::hours(2), BTreeMap::new(), None)
            .unwrap();
        svc.ingest_at("joy", base_time(), BTreeMap::new(), None)
            .unwrap();

        let clusters = svc.clusters_at(base_time(), Some(24.0)).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn hours_to_duration_is_millisecond_exact() {
        assert_eq!(hours_to_duration(1.0), Duration::hours(1));
        assert_eq!(hours_to_duration(0.5), Duration::minutes(30));
        assert_eq!(hours_to_duration(-1.0), Duration::zero());
    }
}
