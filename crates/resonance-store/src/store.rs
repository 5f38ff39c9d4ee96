//! The append-only event store.
//!
//! [`EventStore`] keeps the full event history in memory in append order
//! and, when opened on a path, mirrors every append to a newline-delimited
//! JSON log file. Appends are the only mutating path; reads hand out owned
//! snapshots so derived computations never hold the store open.
//!
//! # Durability model
//!
//! Each append serializes one [`LogRecord`], writes it as a single line,
//! and flushes before the event becomes visible in memory. A crash mid-
//! write leaves at most one truncated trailing line, which the loader
//! skips with a warning on the next open.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use resonance_types::{Event, EventId};

use crate::error::StoreError;
use crate::log::LogRecord;

/// Append-only, time-ordered record of events.
///
/// Construct with [`EventStore::in_memory`] for tests and embedding, or
/// [`EventStore::open`] to load and continue an on-disk log.
#[derive(Debug)]
pub struct EventStore {
    /// All events in append (id) order.
    events: Vec<Event>,
    /// The id the next appended event will receive.
    next_id: EventId,
    /// Buffered writer for the backing log, if any.
    writer: Option<BufWriter<File>>,
    /// Path of the backing log, if any.
    path: Option<PathBuf>,
}

impl EventStore {
    /// Create an empty store with no backing file.
    pub const fn in_memory() -> Self {
        Self {
            events: Vec::new(),
            next_id: EventId::ZERO,
            writer: None,
            path: None,
        }
    }

    /// Open a store backed by the log file at `path`, creating it if it
    /// does not exist and loading any existing records.
    ///
    /// Unparsable or truncated lines are skipped with a warning -- a
    /// partially-written trailing record must not poison the rest of the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be opened or read.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut events = Vec::new();
        let mut next_id = EventId::ZERO;
        let mut skipped: usize = 0;

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match LogRecord::from_line(&line) {
                    Ok(record) => {
                        events.push(record.into_event(next_id));
                        next_id = next_id.next();
                    }
                    Err(error) => {
                        skipped = skipped.saturating_add(1);
                        tracing::warn!(
                            path = %path.display(),
                            line_number = index.saturating_add(1),
                            %error,
                            "skipping unparsable event log record"
                        );
                    }
                }
            }
        }

        let file = OpenOptions::new().append(true).create(true).open(path)?;

        tracing::debug!(
            path = %path.display(),
            loaded = events.len(),
            skipped,
            "opened event log"
        );

        Ok(Self {
            events,
            next_id,
            writer: Some(BufWriter::new(file)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Append one event, returning its newly assigned id.
    ///
    /// Ids are strictly increasing with append order. When the store is
    /// file-backed, the record is written and flushed before the event
    /// becomes visible to readers, so a failed append leaves the snapshot
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when `label` is empty or
    /// whitespace-only, [`StoreError::Serialization`] if the record cannot
    /// be encoded, or [`StoreError::Io`] if the log write fails.
    pub fn append(
        &mut self,
        timestamp: DateTime<Utc>,
        label: &str,
        attributes: BTreeMap<String, String>,
        content: Option<String>,
    ) -> Result<EventId, StoreError> {
        if label.trim().is_empty() {
            return Err(StoreError::validation("event label must be non-empty"));
        }

        let id = self.next_id;
        let event = Event {
            id,
            timestamp,
            label: label.to_owned(),
            attributes,
            content,
        };

        if let Some(writer) = self.writer.as_mut() {
            let mut line = LogRecord::from_event(&event).to_line()?;
            line.push('\n');
            // One write, one flush: the record lands as a unit.
            writer.write_all(line.as_bytes())?;
            writer.flush()?;
        }

        self.next_id = id.next();
        self.events.push(event);

        tracing::debug!(id = %id, label, "appended event");
        Ok(id)
    }

    /// Return all events with `start <= timestamp <= end`, ascending by
    /// timestamp, stable on ties (insertion order).
    ///
    /// An empty store (or an empty window) yields an empty vec, never an
    /// error.
    pub fn read_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Event> {
        let mut slice: Vec<Event> = self
            .events
            .iter()
            .filter(|event| event.timestamp >= start && event.timestamp <= end)
            .cloned()
            .collect();
        // `events` is in insertion order and sort_by is stable, so ties
        // keep their append order.
        slice.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        slice
    }

    /// Borrow the full history in append order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the store.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The path of the backing log, if the store is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flush any buffered log writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the flush fails.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flush and close the store, consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the final flush fails.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.flush()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
