//! FILENAME: slice-engine/src/predicate.rs
//! PURPOSE: Pure membership and projection over (key, specification).
//! CONTEXT: These two functions are the core predicate every view operation
//! funnels through. They hold no state and never touch the backing store.

use keyspace::Key;

use crate::definition::{SliceEntry, SliceSpec};

/// Membership test: does `key` fall inside `spec`?
///
/// Each pinned dimension must match exactly; each ranged dimension must
/// satisfy its inclusive-lower/exclusive-upper bounds. A key of arity less
/// than the specification's dimension count cannot match and returns false.
pub fn in_slice(key: &Key, spec: &SliceSpec) -> bool {
    for (dim, entry) in spec.entries().iter().enumerate() {
        let value = match key.part(dim) {
            Some(value) => value,
            None => return false,
        };
        if !entry.admits(value) {
            return false;
        }
    }
    true
}

/// Projects `key` down to its ranged dimensions, in dimension order.
///
/// Pinned dimensions are dropped. When exactly one ranged dimension
/// remains the result is an arity-1 key, which is the scalar key itself,
/// so a projected key can always be used directly for downstream lookups.
pub fn project(key: &Key, spec: &SliceSpec) -> Key {
    Key::from_parts(
        spec.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_range())
            .filter_map(|(dim, _)| key.part(dim).cloned()),
    )
}
