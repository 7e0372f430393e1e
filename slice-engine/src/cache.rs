//! Cached Slice View - Sorted per-dimension key caches.
//!
//! The backing store offers no iteration order. Rather than sorting every
//! composite key directly, the cached view keeps one sorted, deduplicated
//! list of distinct values per ranged dimension and recombines them on
//! enumeration: each dimension's list is small and reusable across many
//! composite-key checks, and the cartesian walk over already-sorted lists
//! yields genuine lexicographic order.
//!
//! The cache is a point-in-time snapshot. It is rebuilt at construction
//! and on every explicit `resync()`; it does NOT refresh itself when the
//! store's contents change behind a shared reference.

use rustc_hash::FxHashSet;

use keyspace::{Key, KeyStore, KeyValue};

use crate::definition::{SliceEntry, SliceSpec};
use crate::error::SliceError;
use crate::predicate::{in_slice, project};
use crate::view::{SliceRead, SliceResult, SliceView};

/// A slice view that additionally caches, per ranged dimension, the sorted
/// distinct values occurring at that position across matching keys. This
/// makes `keys()`, `values()` and `items()` iterate in lexicographic
/// order, like a table.
pub struct CachedSliceView<'a, S: KeyStore> {
    view: SliceView<'a, S>,
    /// One sorted, deduplicated list per ranged dimension, in dimension
    /// order. A one-dimensional view stores a single list of projected
    /// scalars instead.
    key_parts: Vec<Vec<KeyValue>>,
}

impl<'a, S: KeyStore> std::fmt::Debug for CachedSliceView<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSliceView")
            .field("view", &self.view)
            .field("key_parts", &self.key_parts)
            .finish()
    }
}

impl<'a, S: KeyStore> CachedSliceView<'a, S> {
    /// Creates a fully open cached view; see [`SliceView::over`].
    pub fn over(store: &'a S) -> Self {
        Self::from_view(SliceView::over(store))
    }

    /// Creates a cached view restricted by an explicit specification; see
    /// [`SliceView::with_spec`].
    pub fn with_spec(store: &'a S, spec: SliceSpec) -> Self {
        Self::from_view(SliceView::with_spec(store, spec))
    }

    fn from_view(view: SliceView<'a, S>) -> Self {
        let mut cached = CachedSliceView {
            view,
            key_parts: Vec::new(),
        };
        cached.resync();
        cached
    }

    pub fn dim(&self) -> usize {
        self.view.dim()
    }

    pub fn spec(&self) -> &SliceSpec {
        self.view.spec()
    }

    /// The uncached view this one decorates.
    pub fn view(&self) -> &SliceView<'a, S> {
        &self.view
    }

    /// The cached per-dimension sorted value lists.
    pub fn key_parts(&self) -> &[Vec<KeyValue>] {
        &self.key_parts
    }

    /// Rebuilds the sorted per-dimension value lists from the current
    /// store contents. Callers must invoke this after every store
    /// mutation; a stale cache is not detected.
    pub fn resync(&mut self) {
        let spec = self.view.spec();

        if self.view.dim() == 1 {
            let mut distinct: FxHashSet<KeyValue> = FxHashSet::default();
            for (key, _) in self.view.store().entries() {
                if !in_slice(&key, spec) {
                    continue;
                }
                if let Some(value) = project(&key, spec).into_scalar() {
                    distinct.insert(value);
                }
            }
            let mut part: Vec<KeyValue> = distinct.into_iter().collect();
            part.sort();
            self.key_parts = vec![part];
            return;
        }

        let ranged = spec.ranged_positions();
        let mut distinct: Vec<FxHashSet<KeyValue>> = vec![FxHashSet::default(); ranged.len()];
        for (key, _) in self.view.store().entries() {
            if !in_slice(&key, spec) {
                continue;
            }
            for (slot, &dim) in ranged.iter().enumerate() {
                if let Some(value) = key.part(dim) {
                    distinct[slot].insert(value.clone());
                }
            }
        }

        self.key_parts = distinct
            .into_iter()
            .map(|set| {
                let mut part: Vec<KeyValue> = set.into_iter().collect();
                part.sort();
                part
            })
            .collect();

        log::debug!(
            "slice cache resynced: {} list(s), sizes {:?}",
            self.key_parts.len(),
            self.key_parts.iter().map(Vec::len).collect::<Vec<_>>()
        );
    }

    /// Identical contract to [`SliceView::get`], except a sub-slice result
    /// is itself a cached view, resynced at construction.
    pub fn get(
        &self,
        query: &[SliceEntry],
    ) -> Result<SliceResult<S::Value, CachedSliceView<'a, S>>, SliceError> {
        let resolved = self.view.resolve(query)?;
        match resolved.pinned_key() {
            Some(key) => match self.view.store().fetch(&key) {
                Some(value) => Ok(SliceResult::Value(value)),
                None => Err(SliceError::MissingKey(key)),
            },
            None => Ok(SliceResult::View(CachedSliceView::with_spec(
                self.view.store(),
                resolved,
            ))),
        }
    }

    /// Projected keys in lexicographic order.
    ///
    /// A single cached list already IS the sorted key sequence. Otherwise
    /// the per-dimension lists are recombined with an odometer walk (the
    /// rightmost dimension varies fastest) and each combination is kept
    /// only if its expanded full key actually occurs in the store.
    fn ordered_keys(&self) -> Vec<Key> {
        if self.key_parts.len() == 1 {
            return self.key_parts[0]
                .iter()
                .cloned()
                .map(Key::scalar)
                .collect();
        }

        let mut keys = Vec::new();
        if self.key_parts.iter().any(|part| part.is_empty()) {
            return keys;
        }
        let mut combo = vec![0usize; self.key_parts.len()];
        'walk: loop {
            let candidate = Key::from_parts(
                combo
                    .iter()
                    .zip(&self.key_parts)
                    .map(|(&idx, part)| part[idx].clone()),
            );
            if self.view.contains_projected(&candidate) {
                keys.push(candidate);
            }
            for slot in (0..combo.len()).rev() {
                combo[slot] += 1;
                if combo[slot] < self.key_parts[slot].len() {
                    continue 'walk;
                }
                combo[slot] = 0;
            }
            break;
        }
        keys
    }
}

impl<'a, S: KeyStore> SliceRead for CachedSliceView<'a, S> {
    type Value = S::Value;

    fn len(&self) -> usize {
        self.view.len()
    }

    fn contains(&self, query: &[SliceEntry]) -> bool {
        self.view.contains(query)
    }

    /// Ordered, unlike the uncached view.
    fn keys(&self) -> Vec<Key> {
        self.ordered_keys()
    }

    /// Unprojected keys, in store order (not sorted).
    fn full_keys(&self) -> Vec<Key> {
        self.view.full_keys()
    }

    /// Ordered (projected key, value) pairs.
    fn items(&self) -> Vec<(Key, S::Value)> {
        self.ordered_keys()
            .into_iter()
            .filter_map(|projected| {
                let full = self.view.full_key_for(&projected)?;
                let value = self.view.store().fetch(&full)?;
                Some((projected, value))
            })
            .collect()
    }
}
