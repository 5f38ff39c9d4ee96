//! Decay strategies and the windowed climate aggregation.
//!
//! The "climate" is a decay-weighted count per label over a bounded recent
//! window: each event inside the window contributes a base count term plus
//! a freshness term that shrinks with age. Two decay policies that existed
//! divergently in earlier iterations (linear here, exponential there) are
//! unified behind one [`decay`] function selected by
//! [`DecayStrategy`](resonance_types::DecayStrategy), so the climate and
//! the dominant-vector computations can never drift apart again.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use resonance_types::{DecayStrategy, DominantVector, Event};

use crate::coordinates::{CoordinateMapper, weighted_centroid};

/// Base count term each in-window event contributes, before decay.
const BASE_COUNT_TERM: f64 = 1.0;

/// Per-hour retention factor of the exponential strategy.
const EXPONENTIAL_BASE: f64 = 0.85;

/// Default centroid normalization constant ("magnitude = count / 10").
pub const DEFAULT_NORMALIZATION: f64 = 10.0;

/// Evaluate a decay strategy at the given age.
///
/// Both strategies are non-increasing in age and return `1.0` at age zero.
/// Linear reaches exactly `0.0` at `age == window`; exponential decays as
/// `0.85 ^ age_in_hours` and ignores the window except for the bound the
/// caller applies. Negative ages (events stamped in the future of `now`)
/// are clamped to zero.
pub fn decay(strategy: DecayStrategy, age_hours: f64, window_hours: f64) -> f64 {
    let age = age_hours.max(0.0);
    match strategy {
        DecayStrategy::Linear => {
            if window_hours <= 0.0 {
                return 0.0;
            }
            (1.0 - age / window_hours).max(0.0)
        }
        DecayStrategy::Exponential => EXPONENTIAL_BASE.powf(age),
    }
}

/// Compute the climate: decay-weighted counts per label.
///
/// Each event with `age <= window_hours` contributes
/// `1 + decay(age, window)` to its label's weight; older events contribute
/// nothing (equivalent to pruning). The result is recomputed per query and
/// never persisted, so weights are always consistent with the snapshot.
///
/// An empty snapshot yields an empty map, never an error.
pub fn climate(
    events: &[Event],
    now: DateTime<Utc>,
    window_hours: f64,
    strategy: DecayStrategy,
) -> BTreeMap<String, f64> {
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();

    for event in events {
        let age = event.age_hours(now).max(0.0);
        if age > window_hours {
            continue;
        }
        let contribution = BASE_COUNT_TERM + decay(strategy, age, window_hours);
        *weights.entry(event.label.clone()).or_insert(0.0) += contribution;
    }

    tracing::debug!(
        events = events.len(),
        labels = weights.len(),
        strategy = %strategy,
        window_hours,
        "computed climate"
    );

    weights
}

/// Compute the dominant vector: the centroid of the windowed events in the
/// 2D semantic coordinate space.
///
/// Every in-window event contributes its label's coordinates with unit
/// weight, so the position is the plain average of member coordinates and
/// the magnitude is `count / normalization` -- "average position,
/// magnitude = count/10" with the default constant. An empty window yields
/// [`DominantVector::ZERO`].
pub fn dominant_vector(
    events: &[Event],
    now: DateTime<Utc>,
    window_hours: f64,
    mapper: &CoordinateMapper,
    normalization: f64,
) -> DominantVector {
    let pairs: Vec<_> = events
        .iter()
        .filter(|event| event.age_hours(now).max(0.0) <= window_hours)
        .map(|event| (mapper.coordinates(&event.label), BASE_COUNT_TERM))
        .collect();

    weighted_centroid(&pairs, normalization)
}

// ===========================================================================
// Tests
// ===========================================================================
