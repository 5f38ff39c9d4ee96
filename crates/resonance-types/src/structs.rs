//! Core entity structs for the Resonance correlation core.
//!
//! [`Event`] is the only persisted record; everything else in this module
//! is derived per query and never stored.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ClusterId, EventId};

/// Milliseconds in one hour, as f64 for age arithmetic.
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One timestamped, labeled occurrence in the stream.
///
/// Events are immutable once appended: the store never mutates or deletes
/// them, and every derived result (climate, clusters, patterns) is
/// recomputed from a windowed snapshot rather than maintained
/// incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier, assigned at ingestion in append order.
    pub id: EventId,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Category label (required, non-empty; validated at ingestion).
    pub label: String,
    /// Open key-value attributes (e.g. `source`, `session`).
    pub attributes: BTreeMap<String, String>,
    /// Optional free-text payload.
    pub content: Option<String>,
}

impl Event {
    /// Age of this event relative to `now`, in fractional hours.
    ///
    /// Events with timestamps in the future of `now` yield a negative age;
    /// callers treat those as age zero when weighting.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let millis = now
            .signed_duration_since(self.timestamp)
            .num_milliseconds();
        #[allow(clippy::cast_precision_loss)]
        let millis_f = millis as f64;
        millis_f / MILLIS_PER_HOUR
    }

    /// Whether this event shares any attribute value with `other`.
    ///
    /// A value is shared when the same key is present on both events with
    /// an equal value. Attribute maps are ordered, so the scan is a merge
    /// over two sorted key sets.
    pub fn shares_attribute_value(&self, other: &Self) -> bool {
        self.attributes
            .iter()
            .any(|(key, value)| other.attributes.get(key) == Some(value))
    }

    /// Whether this event has non-empty free-text content.
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

/// A group of temporally- and attribute-related events treated as one
/// correlated session.
///
/// Derived per query; within one clustering pass over a fixed event list,
/// every event id appears in exactly one cluster (a partition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier within the result list (0-indexed).
    pub id: ClusterId,
    /// Member event ids, in ascending time order; the anchor comes first.
    pub members: Vec<EventId>,
    /// Mode of the member labels; ties broken by earliest occurrence.
    pub dominant_label: String,
    /// Timestamp of the anchor (seed) event.
    pub center_timestamp: DateTime<Utc>,
    /// First non-empty member content, or a generated fallback naming the
    /// dominant label and member count.
    pub summary: String,
}

impl Cluster {
    /// Number of member events.
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no members.
    ///
    /// Never true for clusters produced by a clustering pass -- the anchor
    /// is always a member.
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PatternMatch
// ---------------------------------------------------------------------------

/// One immediately-repeating contiguous label subsequence.
///
/// Invariant: `labels` of length `L` satisfy
/// `sequence[start_index .. start_index + L] == sequence[start_index + L .. start_index + 2L]`,
/// i.e. the repetition is adjacent, not general periodicity elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// The repeating unit, in sequence order.
    pub labels: Vec<String>,
    /// Index of the first element of the first occurrence.
    pub start_index: usize,
    /// Index of the last element of the second occurrence (inclusive).
    pub end_index: usize,
    /// Timestamp of the event at `start_index`.
    pub start_timestamp: DateTime<Utc>,
    /// Timestamp of the event at `end_index`.
    pub end_timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CoordinateEntry
// ---------------------------------------------------------------------------

/// Static 2D semantic position for one label.
///
/// Loaded once at startup from the coordinate table asset. Unknown labels
/// resolve to [`CoordinateEntry::fallback`] -- never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateEntry {
    /// Horizontal semantic position (valence axis in the builtin table).
    #[serde(default)]
    pub x: f64,
    /// Vertical semantic position (arousal axis in the builtin table).
    #[serde(default)]
    pub y: f64,
    /// Labels considered semantically adjacent to this one.
    #[serde(default)]
    pub adjacent: BTreeSet<String>,
    /// Intrinsic intensity of the label.
    #[serde(default)]
    pub magnitude: f64,
}

impl CoordinateEntry {
    /// The zero-vector entry used for unknown labels: `(0, 0, {}, 0)`.
    pub const fn fallback() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            adjacent: BTreeSet::new(),
            magnitude: 0.0,
        }
    }
}

impl Default for CoordinateEntry {
    fn default() -> Self {
        Self::fallback()
    }
}

// ---------------------------------------------------------------------------
// DominantVector
// ---------------------------------------------------------------------------

/// Weighted centroid of recent events in the 2D semantic coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantVector {
    /// Centroid x position.
    pub x: f64,
    /// Centroid y position.
    pub y: f64,
    /// Normalized total weight of the contributing events.
    pub magnitude: f64,
}

impl DominantVector {
    /// The zero vector, returned for empty windows.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        magnitude: 0.0,
    };
}

impl Default for DominantVector {
    fn default() -> Self {
        Self::ZERO
    }
}

// ===========================================================================
// Tests
// ===========================================================================
