//! Enumeration types shared across the Resonance workspace.

use serde::{Deserialize, Serialize};

/// Decay policy applied to event ages when computing the climate.
///
/// The two strategies existed divergently in earlier iterations of the
/// system (linear in the climate path, exponential in the vector path);
/// they are unified here behind one selectable policy, chosen once per
/// deployment and exercised identically by every decayed computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayStrategy {
    /// `max(0, 1 - age/window)`: reaches exactly zero at the window edge.
    #[default]
    Linear,
    /// `0.85 ^ age_in_hours`: asymptotic, never quite zero inside the window.
    Exponential,
}

impl DecayStrategy {
    /// Parse a strategy from its lowercase wire name.
    ///
    /// Returns `None` for unknown names; the caller decides whether that
    /// is a query error or a fall-back-to-default situation.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "exponential" => Some(Self::Exponential),
            _ => None,
        }
    }

    /// Return the lowercase wire name of this strategy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Exponential => "exponential",
        }
    }
}

impl core::fmt::Display for DecayStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
