//! Pure computation layer for the Resonance correlation core.
//!
//! Everything in this crate is a side-effect-free function over an
//! immutable event snapshot: the caller reads a windowed slice from the
//! store, hands it in, and gets a derived result back. No module here
//! touches I/O (the coordinate table loader is the one startup-time
//! exception) and nothing holds state between queries, so all of these
//! functions may run concurrently with each other and with ingestion.
//!
//! # Modules
//!
//! - [`coordinates`] -- Label coordinate table and weighted centroid
//!   ([`CoordinateMapper`])
//! - [`decay`] -- Decay strategies and the windowed climate aggregation
//! - [`cluster`] -- Anchor-seeded session clustering
//! - [`pattern`] -- Immediate-repetition loop detection
//! - [`query`] -- Query parameter validation
//! - [`error`] -- Error types ([`EngineError`])

pub mod cluster;
pub mod coordinates;
pub mod decay;
pub mod error;
pub mod pattern;
pub mod query;

pub use cluster::clusters;
pub use coordinates::{CoordinateMapper, CoordinateTableError, weighted_centroid};
pub use decay::{DEFAULT_NORMALIZATION, climate, decay, dominant_vector};
pub use error::EngineError;
pub use pattern::detect_loops;
pub use query::{validate_pattern_bounds, validate_window};
