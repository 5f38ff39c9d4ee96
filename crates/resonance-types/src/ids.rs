//! Type-safe identifier wrappers around monotonic sequence numbers.
//!
//! Event and cluster identifiers are strongly typed to prevent accidental
//! mixing at compile time. Both wrap a `u64` sequence number: event ids are
//! assigned at ingestion in append order (the log line order is the id
//! order), cluster ids are assigned per clustering pass.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// First identifier in the sequence.
            pub const ZERO: Self = Self(0);

            /// Create an identifier from a raw sequence number.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the inner sequence number.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// Return the next identifier in the sequence.
            ///
            /// Saturates at `u64::MAX` rather than wrapping.
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event in the event store.
    ///
    /// Assigned at ingestion, strictly increasing with append order.
    EventId
}

define_id! {
    /// Identifier for a cluster within a single clustering pass.
    ///
    /// Cluster ids are derived per query and are only meaningful within
    /// the result list they appear in.
    ClusterId
}
