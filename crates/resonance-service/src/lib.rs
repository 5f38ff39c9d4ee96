//! The Resonance correlation service facade.
//!
//! This crate ties the workspace together: typed YAML configuration, the
//! append-only event store behind one write lock, input validation at the
//! ingestion boundary, windowed delegation to the pure engine functions,
//! and a plain-text reporting adapter for outer layers.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `resonance-config.yaml`
//! - [`service`] -- The [`CorrelationService`] facade
//! - [`report`] -- Pure plain-text rendering of query results
//! - [`error`] -- Error types ([`ServiceError`])

pub mod config;
pub mod error;
pub mod report;
pub mod service;

pub use config::{ConfigError, CorrelationConfig};
pub use error::ServiceError;
pub use service::CorrelationService;
