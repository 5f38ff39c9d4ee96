//! Anchor-seeded session clustering.
//!
//! Groups related events into correlated sessions with a single ascending
//! pass: the earliest unconsumed event anchors a cluster, and strictly
//! later unconsumed events join it when they are related to the anchor and
//! fall within the window of it. Relatedness is a direct pairwise check
//! against the anchor -- it is deliberately NOT propagated transitively,
//! so two events related only through a third can land in different
//! clusters when their own gap to the anchor exceeds the window. That
//! directional behavior is part of the contract (general connected
//! components would produce a different partition); see DESIGN.md.

use chrono::Duration;

use resonance_types::{Cluster, ClusterId, Event};

/// Group events into session clusters.
///
/// `events` must be sorted ascending by timestamp (the store's
/// `read_range` output). Every event lands in exactly one cluster; an
/// anchor with no related neighbors forms a singleton.
///
/// Two events are related when they carry the same label, or when any
/// attribute key is present on both with an equal value (e.g. the same
/// `source`).
pub fn clusters(events: &[Event], window: Duration) -> Vec<Cluster> {
    let total = events.len();
    let mut consumed = vec![false; total];
    let mut result = Vec::new();
    let mut next_id = ClusterId::ZERO;

    for anchor_index in 0..total {
        if consumed.get(anchor_index).copied().unwrap_or(true) {
            continue;
        }
        let Some(anchor) = events.get(anchor_index) else {
            continue;
        };
        if let Some(flag) = consumed.get_mut(anchor_index) {
            *flag = true;
        }

        let mut members = vec![anchor];

        for candidate_index in anchor_index.saturating_add(1)..total {
            if consumed.get(candidate_index).copied().unwrap_or(true) {
                continue;
            }
            let Some(candidate) = events.get(candidate_index) else {
                continue;
            };
            let gap = candidate.timestamp.signed_duration_since(anchor.timestamp);
            if gap > window {
                // Sorted input: every later candidate is at least this far
                // from the anchor.
                break;
            }
            if related(anchor, candidate) {
                if let Some(flag) = consumed.get_mut(candidate_index) {
                    *flag = true;
                }
                members.push(candidate);
            }
        }

        result.push(build_cluster(next_id, &members));
        next_id = next_id.next();
    }

    tracing::debug!(
        events = total,
        clusters = result.len(),
        "clustered events"
    );

    result
}

/// Direct pairwise relatedness: same label, or any shared attribute value.
fn related(a: &Event, b: &Event) -> bool {
    a.label == b.label || a.shares_attribute_value(b)
}

/// Assemble a [`Cluster`] from its members (anchor first, time order).
fn build_cluster(id: ClusterId, members: &[&Event]) -> Cluster {
    let dominant_label = dominant_label(members);
    let summary = members
        .iter()
        .find(|event| event.has_content())
        .and_then(|event| event.content.clone())
        .unwrap_or_else(|| {
            format!(
                "{count} correlated '{dominant_label}' events",
                count = members.len()
            )
        });

    Cluster {
        id,
        members: members.iter().map(|event| event.id).collect(),
        dominant_label,
        center_timestamp: members
            .first()
            .map(|anchor| anchor.timestamp)
            .unwrap_or_default(),
        summary,
    }
}

/// Mode of the member labels; ties broken by earliest occurrence.
fn dominant_label(members: &[&Event]) -> String {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for event in members {
        let count = counts.entry(event.label.as_str()).or_insert(0);
        *count = count.saturating_add(1);
    }
    let best = counts.values().copied().max().unwrap_or(0);
    members
        .iter()
        .map(|event| event.label.as_str())
        .find(|label| counts.get(label).copied().unwrap_or(0) == best)
        .unwrap_or_default()
        .to_owned()
}

// ===========================================================================
// Tests
// ===========================================================================
