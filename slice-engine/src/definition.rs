//! FILENAME: slice-engine/src/definition.rs
//! Slice Specification - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a slice: which dimensions
//! are pinned to exact values and which remain ranged between optional
//! bounds. These structures are designed to be:
//! - Serializable (for saving/loading view definitions)
//! - Immutable snapshots of caller intent
//! - Composable (a sub-slice merges into a narrower specification)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use keyspace::{Key, KeyValue};

use crate::error::SliceError;

// ============================================================================
// BOUNDS
// ============================================================================

/// Half-open interval bounds over one key dimension.
/// `lower` is inclusive, `upper` is exclusive. A missing bound leaves that
/// side of the dimension open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Option<KeyValue>,
    pub upper: Option<KeyValue>,
}

impl Bounds {
    pub fn new(lower: Option<KeyValue>, upper: Option<KeyValue>) -> Self {
        Bounds { lower, upper }
    }

    /// Bounds open on both sides.
    pub fn unbounded() -> Self {
        Bounds {
            lower: None,
            upper: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// True if `value` satisfies `lower <= value < upper`, where a missing
    /// bound always passes.
    pub fn admits(&self, value: &KeyValue) -> bool {
        if let Some(lower) = &self.lower {
            if value < lower {
                return false;
            }
        }
        if let Some(upper) = &self.upper {
            if value >= upper {
                return false;
            }
        }
        true
    }

    /// Intersects two bound pairs: the result keeps the larger of the two
    /// lower bounds and the smaller of the two upper bounds, treating a
    /// missing bound as infinite on its side. Composition therefore only
    /// ever narrows a range, never widens it.
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let lower = match (&self.lower, &other.lower) {
            (None, None) => None,
            (None, Some(b)) => Some(b.clone()),
            (Some(a), None) => Some(a.clone()),
            (Some(a), Some(b)) => Some(a.clone().max(b.clone())),
        };
        let upper = match (&self.upper, &other.upper) {
            (None, None) => None,
            (None, Some(b)) => Some(b.clone()),
            (Some(a), None) => Some(a.clone()),
            (Some(a), Some(b)) => Some(a.clone().min(b.clone())),
        };
        Bounds { lower, upper }
    }
}

// ============================================================================
// SLICE ENTRY
// ============================================================================

/// One entry of a slice specification: either pins its dimension to an
/// exact value or leaves it ranged between optional bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceEntry {
    /// The key value at this dimension must equal the pinned value exactly.
    Pin(KeyValue),
    /// The key value at this dimension must fall inside the bounds.
    Range(Bounds),
}

impl SliceEntry {
    /// Pins the dimension to an exact value.
    pub fn pin(value: impl Into<KeyValue>) -> Self {
        SliceEntry::Pin(value.into())
    }

    /// Leaves the dimension fully open.
    pub fn all() -> Self {
        SliceEntry::Range(Bounds::unbounded())
    }

    /// Ranges the dimension over `[lower, upper)`.
    pub fn range(lower: impl Into<KeyValue>, upper: impl Into<KeyValue>) -> Self {
        SliceEntry::Range(Bounds::new(Some(lower.into()), Some(upper.into())))
    }

    /// Ranges the dimension over `[lower, +inf)`.
    pub fn at_least(lower: impl Into<KeyValue>) -> Self {
        SliceEntry::Range(Bounds::new(Some(lower.into()), None))
    }

    /// Ranges the dimension over `(-inf, upper)`.
    pub fn below(upper: impl Into<KeyValue>) -> Self {
        SliceEntry::Range(Bounds::new(None, Some(upper.into())))
    }

    pub fn is_pin(&self) -> bool {
        matches!(self, SliceEntry::Pin(_))
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SliceEntry::Range(_))
    }

    /// True if a key holding `value` at this dimension satisfies the entry.
    pub fn admits(&self, value: &KeyValue) -> bool {
        match self {
            SliceEntry::Pin(pinned) => value == pinned,
            SliceEntry::Range(bounds) => bounds.admits(value),
        }
    }
}

// ============================================================================
// SLICE SPECIFICATION
// ============================================================================

/// A full slice specification: one entry per key dimension, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSpec {
    entries: SmallVec<[SliceEntry; 4]>,
}

impl SliceSpec {
    pub fn new(entries: impl IntoIterator<Item = SliceEntry>) -> Self {
        SliceSpec {
            entries: entries.into_iter().collect(),
        }
    }

    /// The fully open specification over `dim` dimensions.
    pub fn unbounded(dim: usize) -> Self {
        SliceSpec {
            entries: std::iter::repeat_with(SliceEntry::all).take(dim).collect(),
        }
    }

    /// Number of dimensions this specification spans.
    pub fn dim(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SliceEntry] {
        &self.entries
    }

    pub fn entry(&self, dim: usize) -> Option<&SliceEntry> {
        self.entries.get(dim)
    }

    /// Dimension indices still ranged, in dimension order. The position of
    /// a dimension in this list is its ordinal in a projected key.
    pub fn ranged_positions(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_range())
            .map(|(dim, _)| dim)
            .collect()
    }

    pub fn ranged_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_range()).count()
    }

    pub fn is_fully_pinned(&self) -> bool {
        self.entries.iter().all(|entry| entry.is_pin())
    }

    /// When every dimension is pinned, assembles the exact key this
    /// specification addresses. None if any dimension is still ranged.
    pub fn pinned_key(&self) -> Option<Key> {
        let mut parts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match entry {
                SliceEntry::Pin(value) => parts.push(value.clone()),
                SliceEntry::Range(_) => return None,
            }
        }
        Some(Key::from_parts(parts))
    }

    /// Merges caller-supplied selectors against this specification,
    /// producing a new full-length specification.
    ///
    /// The caller supplies exactly one selector per ranged dimension, in
    /// dimension order; pinned dimensions are never supplied and always
    /// stay pinned. A selector that pins a ranged dimension pins it; a
    /// selector that ranges it intersects the two bound pairs.
    pub fn resolve(&self, query: &[SliceEntry]) -> Result<SliceSpec, SliceError> {
        let expected = self.ranged_count();
        if query.len() != expected {
            return Err(SliceError::ArityMismatch {
                expected,
                supplied: query.len(),
            });
        }

        let mut merged = SmallVec::with_capacity(self.entries.len());
        let mut next = 0;
        for entry in &self.entries {
            match entry {
                SliceEntry::Pin(value) => merged.push(SliceEntry::Pin(value.clone())),
                SliceEntry::Range(bounds) => {
                    match &query[next] {
                        SliceEntry::Pin(value) => merged.push(SliceEntry::Pin(value.clone())),
                        SliceEntry::Range(narrower) => {
                            merged.push(SliceEntry::Range(bounds.intersect(narrower)))
                        }
                    }
                    next += 1;
                }
            }
        }

        Ok(SliceSpec { entries: merged })
    }
}
