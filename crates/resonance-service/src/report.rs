//! Plain-text rendering of query results.
//!
//! These functions are pure formatters for outer layers (a CLI, a status
//! endpoint); nothing in the service or engine calls them. Weights are
//! rendered to two decimal places, which is enough for a human scan and
//! keeps the output stable across platforms.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use resonance_types::{Cluster, DominantVector, PatternMatch};

/// Render a climate map as `label: weight` lines, heaviest first.
pub fn climate_report(weights: &BTreeMap<String, f64>) -> String {
    if weights.is_empty() {
        return "no events in window\n".to_owned();
    }

    let mut rows: Vec<(&str, f64)> = weights
        .iter()
        .map(|(label, weight)| (label.as_str(), *weight))
        .collect();
    // Heaviest first; the map's label order breaks weight ties.
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut out = String::new();
    for (label, weight) in rows {
        let _ = writeln!(out, "{label}: {weight:.2}");
    }
    out
}

/// Render clusters as one summary line each, in cluster-id order.
pub fn clusters_report(clusters: &[Cluster]) -> String {
    if clusters.is_empty() {
        return "no clusters in window\n".to_owned();
    }

    let mut out = String::new();
    for cluster in clusters {
        let _ = writeln!(
            out,
            "[{id}] {label} x{count} @ {center}: {summary}",
            id = cluster.id,
            label = cluster.dominant_label,
            count = cluster.len(),
            center = cluster.center_timestamp.to_rfc3339(),
            summary = cluster.summary,
        );
    }
    out
}

/// Render pattern matches as one line each, in detection order.
pub fn patterns_report(matches: &[PatternMatch]) -> String {
    if matches.is_empty() {
        return "no repeated sequences in window\n".to_owned();
    }

    let mut out = String::new();
    for found in matches {
        let _ = writeln!(
            out,
            "loop [{labels}] twice at events {start}..={end} ({from} .. {to})",
            labels = found.labels.join(", "),
            start = found.start_index,
            end = found.end_index,
            from = found.start_timestamp.to_rfc3339(),
            to = found.end_timestamp.to_rfc3339(),
        );
    }
    out
}

/// Render a dominant vector on one line.
pub fn dominant_vector_report(vector: &DominantVector) -> String {
    format!(
        "dominant vector: ({x:.2}, {y:.2}) magnitude {magnitude:.2}\n",
        x = vector.x,
        y = vector.y,
        magnitude = vector.magnitude,
    )
}

// ===========================================================================
// Tests
// ===========================================================================
