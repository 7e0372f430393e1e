//! FILENAME: slice-engine/src/view.rs
//! Slice View - The lazy, uncached view over a backing store.
//!
//! A view borrows a store and a slice specification and resolves lookups
//! against them on every call. Nothing is copied out of the store and no
//! index is kept: every enumeration is a filter/project pass over the
//! store's entries, in store iteration order.

use keyspace::{Key, KeyStore};

use crate::definition::{SliceEntry, SliceSpec};
use crate::error::SliceError;
use crate::predicate::{in_slice, project};

// ============================================================================
// LOOKUP RESULT
// ============================================================================

/// The outcome of a slice lookup: a stored value when every dimension
/// resolved to a pin, otherwise a narrower view.
#[derive(Debug)]
pub enum SliceResult<V, W> {
    Value(V),
    View(W),
}

impl<V, W> SliceResult<V, W> {
    pub fn is_value(&self) -> bool {
        matches!(self, SliceResult::Value(_))
    }

    pub fn is_view(&self) -> bool {
        matches!(self, SliceResult::View(_))
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            SliceResult::Value(value) => Some(value),
            SliceResult::View(_) => None,
        }
    }

    pub fn into_view(self) -> Option<W> {
        match self {
            SliceResult::Value(_) => None,
            SliceResult::View(view) => Some(view),
        }
    }
}

// ============================================================================
// READ CAPABILITY
// ============================================================================

/// Read-only capability shared by both view kinds. The cached view
/// implements the same set with ordered `keys`/`items`/`values`.
pub trait SliceRead {
    type Value;

    /// Count of stored keys satisfying the current specification.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True iff the query pins every remaining dimension, the resulting
    /// full key satisfies the current specification, and the store holds
    /// it. Queries that leave a range open or fail to resolve are simply
    /// not contained.
    fn contains(&self, query: &[SliceEntry]) -> bool;

    /// Projected keys of every matching stored entry.
    fn keys(&self) -> Vec<Key>;

    /// Original, unprojected keys of every matching stored entry.
    fn full_keys(&self) -> Vec<Key>;

    /// (projected key, value) pairs of every matching stored entry.
    fn items(&self) -> Vec<(Key, Self::Value)>;

    /// Values of every matching stored entry.
    fn values(&self) -> Vec<Self::Value> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }
}

// ============================================================================
// SLICE VIEW
// ============================================================================

/// A sliceable view over a backing store.
///
/// The view never mutates or copies the store; it narrows on sub-slicing
/// by producing a new view with a composed specification.
pub struct SliceView<'a, S: KeyStore> {
    store: &'a S,
    dim: usize,
    spec: SliceSpec,
    /// Dimension index of each ranged position, in dimension order. The
    /// position of an index in this list is its ordinal in projected keys.
    ranged: Vec<usize>,
}

impl<'a, S: KeyStore> Clone for SliceView<'a, S> {
    fn clone(&self) -> Self {
        SliceView {
            store: self.store,
            dim: self.dim,
            spec: self.spec.clone(),
            ranged: self.ranged.clone(),
        }
    }
}

impl<'a, S: KeyStore> std::fmt::Debug for SliceView<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceView")
            .field("dim", &self.dim)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl<'a, S: KeyStore> SliceView<'a, S> {
    /// Creates a fully open view. The dimension count is inferred as the
    /// largest key arity present in the store (0 for an empty store).
    pub fn over(store: &'a S) -> Self {
        let dim = store
            .entries()
            .map(|(key, _)| key.arity())
            .max()
            .unwrap_or(0);
        Self::with_spec(store, SliceSpec::unbounded(dim))
    }

    /// Creates a view restricted by an explicit specification. The
    /// dimension count is the specification's length; no inference is
    /// performed.
    pub fn with_spec(store: &'a S, spec: SliceSpec) -> Self {
        let ranged = spec.ranged_positions();
        SliceView {
            store,
            dim: spec.dim(),
            spec,
            ranged,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn spec(&self) -> &SliceSpec {
        &self.spec
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    /// Merges caller-supplied selectors against the current specification.
    /// See [`SliceSpec::resolve`].
    pub fn resolve(&self, query: &[SliceEntry]) -> Result<SliceSpec, SliceError> {
        self.spec.resolve(query)
    }

    /// Resolves the query and either fetches the stored value (every
    /// dimension pinned) or returns a narrower view (at least one range
    /// left). A fully pinned key absent from the store is a
    /// [`SliceError::MissingKey`].
    pub fn get(
        &self,
        query: &[SliceEntry],
    ) -> Result<SliceResult<S::Value, SliceView<'a, S>>, SliceError> {
        let resolved = self.resolve(query)?;
        match resolved.pinned_key() {
            Some(key) => match self.store.fetch(&key) {
                Some(value) => Ok(SliceResult::Value(value)),
                None => Err(SliceError::MissingKey(key)),
            },
            None => Ok(SliceResult::View(SliceView::with_spec(
                self.store, resolved,
            ))),
        }
    }

    /// Expands a projected key back to a full key by filling pinned
    /// dimensions from the specification. None if the projected key's
    /// arity does not match the number of ranged dimensions.
    pub(crate) fn full_key_for(&self, projected: &Key) -> Option<Key> {
        if projected.arity() != self.ranged.len() {
            return None;
        }
        let mut parts = Vec::with_capacity(self.dim);
        let mut next = 0;
        for entry in self.spec.entries() {
            match entry {
                SliceEntry::Pin(value) => parts.push(value.clone()),
                SliceEntry::Range(_) => {
                    parts.push(projected.part(next)?.clone());
                    next += 1;
                }
            }
        }
        Some(Key::from_parts(parts))
    }

    /// True if the projected key expands to a full key that satisfies the
    /// specification and is present in the store.
    pub(crate) fn contains_projected(&self, projected: &Key) -> bool {
        match self.full_key_for(projected) {
            Some(full) => in_slice(&full, &self.spec) && self.store.contains_key(&full),
            None => false,
        }
    }
}

impl<'a, S: KeyStore> SliceRead for SliceView<'a, S> {
    type Value = S::Value;

    fn len(&self) -> usize {
        self.store
            .entries()
            .filter(|(key, _)| in_slice(key, &self.spec))
            .count()
    }

    fn contains(&self, query: &[SliceEntry]) -> bool {
        let resolved = match self.resolve(query) {
            Ok(resolved) => resolved,
            Err(_) => return false,
        };
        match resolved.pinned_key() {
            Some(key) => in_slice(&key, &self.spec) && self.store.contains_key(&key),
            None => false,
        }
    }

    fn keys(&self) -> Vec<Key> {
        self.store
            .entries()
            .filter(|(key, _)| in_slice(key, &self.spec))
            .map(|(key, _)| project(&key, &self.spec))
            .collect()
    }

    fn full_keys(&self) -> Vec<Key> {
        self.store
            .entries()
            .filter(|(key, _)| in_slice(key, &self.spec))
            .map(|(key, _)| key)
            .collect()
    }

    fn items(&self) -> Vec<(Key, S::Value)> {
        self.store
            .entries()
            .filter(|(key, _)| in_slice(key, &self.spec))
            .map(|(key, value)| (project(&key, &self.spec), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_store() -> HashMap<Key, i64> {
        let mut store = HashMap::new();
        store.insert(Key::from((1, 'a')), 10);
        store.insert(Key::from((1, 'b')), 20);
        store.insert(Key::from((2, 'a')), 30);
        store
    }

    fn create_scalar_store() -> HashMap<Key, i64> {
        let mut store = HashMap::new();
        for k in [2i64, 5, 9, 10, 15] {
            store.insert(Key::from(k), k * 100);
        }
        store
    }

    #[test]
    fn test_dimension_inference() {
        let store = create_test_store();
        let view = SliceView::over(&store);
        assert_eq!(view.dim(), 2);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_pin_first_dimension_returns_subview() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let sub = view
            .get(&[SliceEntry::pin(1), SliceEntry::all()])
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(sub.len(), 2);
        let mut keys = sub.keys();
        keys.sort();
        assert_eq!(keys, vec![Key::from('a'), Key::from('b')]);
    }

    #[test]
    fn test_full_pin_lookup_returns_value() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let result = view
            .get(&[SliceEntry::pin(1), SliceEntry::pin('b')])
            .unwrap();
        assert_eq!(result.into_value(), Some(20));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let err = view
            .get(&[SliceEntry::pin(2), SliceEntry::pin('b')])
            .unwrap_err();
        assert_eq!(err, SliceError::MissingKey(Key::from((2, 'b'))));
    }

    #[test]
    fn test_range_upper_bound_is_exclusive() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let sub = view
            .get(&[SliceEntry::all(), SliceEntry::range('a', 'b')])
            .unwrap()
            .into_view()
            .unwrap();

        let mut full = sub.full_keys();
        full.sort();
        assert_eq!(full, vec![Key::from((1, 'a')), Key::from((2, 'a'))]);
    }

    #[test]
    fn test_nested_slice_intersects_bounds() {
        // Bounds compose by intersection: [2, 10) then [5, 20) is [5, 10).
        let store = create_scalar_store();
        let view = SliceView::over(&store);

        let outer = view
            .get(&[SliceEntry::range(2, 10)])
            .unwrap()
            .into_view()
            .unwrap();
        let inner = outer
            .get(&[SliceEntry::range(5, 20)])
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(
            inner.spec().entry(0),
            Some(&SliceEntry::range(5, 10)),
            "composed bounds must be max(lowers)..min(uppers)"
        );
        let mut keys = inner.keys();
        keys.sort();
        assert_eq!(keys, vec![Key::from(5), Key::from(9)]);
    }

    #[test]
    fn test_pin_survives_nested_slice() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let sub = view
            .get(&[SliceEntry::pin(1), SliceEntry::all()])
            .unwrap()
            .into_view()
            .unwrap();
        // The remaining ranged dimension takes the one selector; the pin
        // is not supplied again and cannot be widened.
        let narrower = sub
            .get(&[SliceEntry::range('a', 'z')])
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(narrower.spec().entry(0), Some(&SliceEntry::pin(1)));
        assert_eq!(narrower.len(), 2);
    }

    #[test]
    fn test_selector_arity_mismatch() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let err = view.get(&[SliceEntry::pin(1)]).unwrap_err();
        assert_eq!(
            err,
            SliceError::ArityMismatch {
                expected: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_full_pin_lookup_does_not_filter() {
        // A direct lookup goes straight to the store, even when the pinned
        // value lies outside the view's own bounds.
        let store = create_scalar_store();
        let view = SliceView::with_spec(&store, SliceSpec::new([SliceEntry::range(2, 10)]));

        let result = view.get(&[SliceEntry::pin(15)]).unwrap();
        assert_eq!(result.into_value(), Some(1500));
    }

    #[test]
    fn test_contains_respects_current_bounds() {
        // Unlike get, containment re-checks the view's specification.
        let store = create_scalar_store();
        let view = SliceView::with_spec(&store, SliceSpec::new([SliceEntry::range(2, 10)]));

        assert!(view.contains(&[SliceEntry::pin(5)]));
        assert!(!view.contains(&[SliceEntry::pin(15)]));
        assert!(!view.contains(&[SliceEntry::pin(3)]), "3 is not stored");
    }

    #[test]
    fn test_contains_rejects_open_or_malformed_queries() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        assert!(view.contains(&[SliceEntry::pin(1), SliceEntry::pin('a')]));
        assert!(!view.contains(&[SliceEntry::pin(1), SliceEntry::all()]));
        assert!(!view.contains(&[SliceEntry::pin(1)]));
    }

    #[test]
    fn test_items_pair_projections_with_values() {
        let store = create_test_store();
        let view = SliceView::over(&store);

        let sub = view
            .get(&[SliceEntry::pin(1), SliceEntry::all()])
            .unwrap()
            .into_view()
            .unwrap();

        let mut items = sub.items();
        items.sort();
        assert_eq!(items, vec![(Key::from('a'), 10), (Key::from('b'), 20)]);

        let mut values = sub.values();
        values.sort();
        assert_eq!(values, vec![10, 20]);
    }

    #[test]
    fn test_empty_store_has_dimension_zero() {
        let store: HashMap<Key, i64> = HashMap::new();
        let view = SliceView::over(&store);
        assert_eq!(view.dim(), 0);
        assert!(view.is_empty());
        assert!(view.keys().is_empty());
    }
}
