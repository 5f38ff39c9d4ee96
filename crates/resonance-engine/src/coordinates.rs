//! Label coordinate table and weighted centroid computation.
//!
//! Every label maps to a static position in a 2D semantic space (the
//! builtin table uses a valence/arousal layout), an adjacency set, and an
//! intrinsic magnitude. The table is read-only after construction, which
//! makes the mapper thread-safe by construction; unknown labels resolve to
//! the documented zero-vector fallback, never an error.

use std::collections::BTreeMap;
use std::path::Path;

use resonance_types::{CoordinateEntry, DominantVector};

/// Errors that can occur when loading the coordinate table asset.
#[derive(Debug, thiserror::Error)]
pub enum CoordinateTableError {
    /// Failed to read the asset file from disk.
    #[error("failed to read coordinate table: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the asset YAML.
    #[error("failed to parse coordinate table YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for CoordinateTableError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Static label -> 2D semantic position mapper.
///
/// Pure and stateless after construction: [`coordinates`](Self::coordinates)
/// borrows entries from the immutable table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    /// The label table, ordered for deterministic iteration.
    entries: BTreeMap<String, CoordinateEntry>,
    /// The zero-vector entry handed out for unknown labels.
    fallback: CoordinateEntry,
}

impl CoordinateMapper {
    /// Build a mapper from an explicit table.
    pub const fn new(entries: BTreeMap<String, CoordinateEntry>) -> Self {
        Self {
            entries,
            fallback: CoordinateEntry::fallback(),
        }
    }

    /// The builtin affect-circumplex table.
    ///
    /// x is valence (negative = unpleasant), y is arousal (negative =
    /// deactivated). Used when no coordinate asset is configured.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        for (label, x, y, magnitude, adjacent) in BUILTIN_TABLE {
            entries.insert(
                (*label).to_owned(),
                CoordinateEntry {
                    x: *x,
                    y: *y,
                    adjacent: adjacent.iter().map(|a| (*a).to_owned()).collect(),
                    magnitude: *magnitude,
                },
            );
        }
        Self::new(entries)
    }

    /// Load a mapper from a YAML asset of the form
    /// `label: {x, y, adjacent: [...], magnitude}`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateTableError::Io`] if the file cannot be read, or
    /// [`CoordinateTableError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, CoordinateTableError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a mapper from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateTableError::Yaml`] if the string is not valid
    /// YAML.
    pub fn parse(yaml: &str) -> Result<Self, CoordinateTableError> {
        let entries: BTreeMap<String, CoordinateEntry> = serde_yml::from_str(yaml)?;
        Ok(Self::new(entries))
    }

    /// Look up the coordinate entry for a label.
    ///
    /// Unknown labels resolve to the zero-vector fallback `(0, 0, {}, 0)`.
    pub fn coordinates(&self, label: &str) -> &CoordinateEntry {
        self.entries.get(label).unwrap_or(&self.fallback)
    }

    /// Whether the table contains an explicit entry for `label`.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Number of explicit entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the known labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Compute the weighted centroid of coordinate entries.
///
/// `x = Σ(wᵢxᵢ) / Σwᵢ`, `y` analogously, `magnitude = Σwᵢ / normalization`.
/// Empty input yields [`DominantVector::ZERO`]. A non-positive
/// `normalization` falls back to [`crate::decay::DEFAULT_NORMALIZATION`].
pub fn weighted_centroid(
    pairs: &[(&CoordinateEntry, f64)],
    normalization: f64,
) -> DominantVector {
    if pairs.is_empty() {
        return DominantVector::ZERO;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut total_weight = 0.0;
    for (entry, weight) in pairs {
        sum_x += weight * entry.x;
        sum_y += weight * entry.y;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return DominantVector::ZERO;
    }

    let norm = if normalization > 0.0 {
        normalization
    } else {
        crate::decay::DEFAULT_NORMALIZATION
    };

    DominantVector {
        x: sum_x / total_weight,
        y: sum_y / total_weight,
        magnitude: total_weight / norm,
    }
}

/// The builtin table: `(label, x, y, magnitude, adjacent)`.
const BUILTIN_TABLE: &[(&str, f64, f64, f64, &[&str])] = &[
    ("joy", 0.8, 0.6, 0.9, &["contentment", "excitement"]),
    ("excitement", 0.6, 0.9, 0.9, &["joy", "anticipation"]),
    ("contentment", 0.7, -0.3, 0.5, &["joy", "calm"]),
    ("calm", 0.4, -0.7, 0.4, &["contentment"]),
    ("anticipation", 0.3, 0.5, 0.6, &["excitement", "anxiety"]),
    ("surprise", 0.1, 0.8, 0.7, &["excitement", "fear"]),
    ("anxiety", -0.4, 0.7, 0.7, &["fear", "anticipation"]),
    ("fear", -0.7, 0.8, 0.9, &["anxiety", "surprise"]),
    ("anger", -0.8, 0.7, 0.9, &["frustration", "fear"]),
    ("frustration", -0.6, 0.4, 0.7, &["anger", "sadness"]),
    ("sadness", -0.7, -0.4, 0.8, &["frustration", "fatigue"]),
    ("fatigue", -0.3, -0.8, 0.5, &["sadness", "calm"]),
];

// ===========================================================================
// Tests
// ===========================================================================
