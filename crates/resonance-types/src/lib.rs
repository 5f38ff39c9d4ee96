//! Shared type definitions for the Resonance correlation core.
//!
//! This crate is the single source of truth for the data model used across
//! the Resonance workspace: the immutable [`Event`] record, the derived
//! query results ([`Cluster`], [`PatternMatch`], [`DominantVector`]), and
//! the static coordinate table entries ([`CoordinateEntry`]).
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe sequence-number wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (decay strategy selection)
//! - [`structs`] -- Core entity structs (events, clusters, patterns,
//!   coordinates)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::DecayStrategy;
pub use ids::{ClusterId, EventId};
pub use structs::{Cluster, CoordinateEntry, DominantVector, Event, PatternMatch};
