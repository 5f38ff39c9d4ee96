//! Immediate-repetition ("loop") detection over label sequences.
//!
//! A loop is a contiguous label sequence of length `l` followed directly by
//! an identical sequence of length `l`. Detection is exhaustive: every
//! start position is checked at every candidate length, and overlapping or
//! nested repetitions are all reported. Only time-adjacent repeats count --
//! `A B X A B` is not a loop because `X` interrupts the pair.

use resonance_types::{Event, PatternMatch};

/// Detect immediately repeated label sequences.
///
/// `events` must be sorted ascending by timestamp. Candidate lengths run
/// from `min_length` to `max_length`, additionally capped at half the
/// event count (a repeat of length `l` needs `2l` events). Matches are
/// reported shortest-first, then by start position; `end_index` is the
/// inclusive index of the last event of the second occurrence.
///
/// A `min_length` of zero yields no matches (the facade rejects it before
/// calling here, but the scan itself is total).
pub fn detect_loops(events: &[Event], min_length: usize, max_length: usize) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    if min_length == 0 {
        return matches;
    }

    let labels: Vec<&str> = events.iter().map(|event| event.label.as_str()).collect();
    let upper = max_length.min(labels.len() / 2);

    for length in min_length..=upper {
        let double = length.saturating_mul(2);
        let Some(last_start) = labels.len().checked_sub(double) else {
            continue;
        };
        for start in 0..=last_start {
            let mid = start.saturating_add(length);
            let end = start.saturating_add(double);
            let first = labels.get(start..mid);
            let second = labels.get(mid..end);
            if first.is_none() || first != second {
                continue;
            }
            let Some(sequence) = first else { continue };
            let end_index = end.saturating_sub(1);
            let (Some(first_event), Some(last_event)) =
                (events.get(start), events.get(end_index))
            else {
                continue;
            };
            matches.push(PatternMatch {
                labels: sequence.iter().map(|label| (*label).to_owned()).collect(),
                start_index: start,
                end_index,
                start_timestamp: first_event.timestamp,
                end_timestamp: last_event.timestamp,
            });
        }
    }

    tracing::debug!(
        events = events.len(),
        min_length,
        max_length,
        matches = matches.len(),
        "scanned for loops"
    );

    matches
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use resonance_types::EventId;

    use super::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_default()
    }

    fn sequence(labels: &[&str]) -> Vec<Event> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| Event {
                id: EventId::new(index as u64),
                timestamp: base_time() + Duration::minutes(index as i64),
                label: (*label).to_owned(),
                attributes: BTreeMap::new(),
                content: None,
            })
            .collect()
    }

    #[test]
    fn empty_input_has_no_loops() {
        assert!(detect_loops(&[], 1, 10).is_empty());
    }

    #[test]
    fn fewer_events_than_twice_min_length_has_no_loops() {
        let events = sequence(&["a", "b", "a"]);
        assert!(detect_loops(&events, 2, 10).is_empty());
    }

    #[test]
    fn adjacent_pair_repeat_is_exactly_one_match() {
        let events = sequence(&["A", "B", "A", "B"]);
        let matches = detect_loops(&events, 2, 10);
        assert_eq!(matches.len(), 1);

        let found = matches.first();
        assert_eq!(
            found.map(|m| m.labels.clone()),
            Some(vec!["A".to_owned(), "B".to_owned()])
        );
        assert_eq!(found.map(|m| m.start_index), Some(0));
        assert_eq!(found.map(|m| m.end_index), Some(3));
        assert_eq!(found.map(|m| m.start_timestamp), Some(base_time()));
        assert_eq!(
            found.map(|m| m.end_timestamp),
            Some(base_time() + Duration::minutes(3))
        );
    }

    #[test]
    fn interrupted_repeat_is_not_a_loop() {
        let events = sequence(&["A", "B", "X", "A", "B"]);
        assert!(detect_loops(&events, 2, 10).is_empty());
    }

    #[test]
    fn single_label_repeat_at_length_one() {
        let events = sequence(&["A", "A"]);
        let matches = detect_loops(&events, 1, 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches.first().map(|m| m.labels.clone()),
            Some(vec!["A".to_owned()])
        );
    }

    #[test]
    fn overlapping_matches_are_all_reported() {
        // "A A A": length-1 repeats at starts 0 and 1.
        let events = sequence(&["A", "A", "A"]);
        let matches = detect_loops(&events, 1, 10);
        assert_eq!(matches.len(), 2);
        let starts: Vec<usize> = matches.iter().map(|m| m.start_index).collect();
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn matches_are_ordered_shortest_first_then_by_start() {
        // "A A A A" has three length-1 matches (starts 0, 1, 2) and one
        // length-2 match (start 0).
        let events = sequence(&["A", "A", "A", "A"]);
        let matches = detect_loops(&events, 1, 10);
        let shape: Vec<(usize, usize)> = matches
            .iter()
            .map(|m| (m.labels.len(), m.start_index))
            .collect();
        assert_eq!(shape, vec![(1, 0), (1, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn length_bounds_are_honored() {
        let events = sequence(&["A", "A", "A", "A"]);
        // Only length 2 allowed: the three length-1 repeats disappear.
        let matches = detect_loops(&events, 2, 2);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.first().map(|m| m.labels.len()), Some(2));
    }

    #[test]
    fn min_length_zero_yields_nothing() {
        let events = sequence(&["A", "A"]);
        assert!(detect_loops(&events, 0, 10).is_empty());
    }

    #[test]
    fn alternating_sequence_counts() {
        // Ten events A B A B A B A B A B with lengths 2..=5:
        // length 2 ("A B" / "B A" repeats) matches at starts 0..=6 -> 7,
        // length 3 never matches (parity), length 4 matches at starts
        // 0, 1, 2 -> 3, length 5 never matches. Total 10.
        let events = sequence(&["A", "B", "A", "B", "A", "B", "A", "B", "A", "B"]);
        let matches = detect_loops(&events, 2, 5);
        assert_eq!(matches.len(), 10);

        let by_length = |l: usize| matches.iter().filter(|m| m.labels.len() == l).count();
        assert_eq!(by_length(2), 7);
        assert_eq!(by_length(3), 0);
        assert_eq!(by_length(4), 3);
        assert_eq!(by_length(5), 0);
    }

    #[test]
    fn max_length_is_capped_by_half_the_event_count() {
        // Six events can only host repeats up to length 3 even when the
        // caller allows 100.
        let events = sequence(&["A", "B", "C", "A", "B", "C"]);
        let matches = detect_loops(&events, 1, 100);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.first().map(|m| m.labels.len()), Some(3));
    }

    #[test]
    fn timestamps_span_both_occurrences() {
        let events = sequence(&["A", "A", "A"]);
        let matches = detect_loops(&events, 1, 1);
        let second = matches.get(1);
        assert_eq!(
            second.map(|m| m.start_timestamp),
            Some(base_time() + Duration::minutes(1))
        );
        assert_eq!(
            second.map(|m| m.end_timestamp),
            Some(base_time() + Duration::minutes(2))
        );
    }
}
