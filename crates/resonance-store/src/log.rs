//! The on-disk log line format.
//!
//! The persisted log is append-only UTF-8, one JSON record per line:
//! `{"timestamp", "label", "content", "attributes"}`. Records carry no id;
//! ids are reassigned from line order at load, which preserves both
//! monotonicity and insertion-order tie-breaks. No in-place edits ever
//! happen -- consumers tolerate and skip a final unparsable or truncated
//! line.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use resonance_types::{Event, EventId};

/// One serialized log line.
///
/// This is the wire form of an [`Event`] minus the id. Field order is
/// fixed by the struct so appended lines stay diffable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the event occurred (RFC 3339 in the serialized form).
    pub timestamp: DateTime<Utc>,
    /// Category label.
    pub label: String,
    /// Optional free-text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Open key-value attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl LogRecord {
    /// Build a log record from the parts of an event.
    pub fn from_event(event: &Event) -> Self {
        Self {
            timestamp: event.timestamp,
            label: event.label.clone(),
            content: event.content.clone(),
            attributes: event.attributes.clone(),
        }
    }

    /// Rehydrate an event, assigning the id from the record's position in
    /// the log.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            timestamp: self.timestamp,
            label: self.label,
            attributes: self.attributes,
            content: self.content,
        }
    }

    /// Serialize to a single log line (no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse one log line.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed or
    /// truncated lines; the loader turns that into a skip-with-warning,
    /// not a hard failure.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
