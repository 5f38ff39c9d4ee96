//! Append-only event storage for the Resonance correlation core.
//!
//! Events are the source of truth -- every derived result (climate,
//! clusters, patterns) is recomputed from a windowed slice of the event
//! history rather than maintained incrementally. This crate owns the
//! append-only record of that history: an in-memory ordered list, with an
//! optional newline-delimited JSON log file behind it for durability.
//!
//! # Modules
//!
//! - [`error`] -- Error types for the storage boundary ([`StoreError`])
//! - [`log`] -- The on-disk line format ([`log::LogRecord`]) and line codec
//! - [`store`] -- The [`EventStore`] itself

pub mod error;
pub mod log;
pub mod store;

pub use error::StoreError;
pub use store::EventStore;
