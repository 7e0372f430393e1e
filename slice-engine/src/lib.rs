//! FILENAME: slice-engine/src/lib.rs
//! Multi-dimensional slicing views over composite-key stores.
//!
//! This crate lets a caller address any [`keyspace::KeyStore`] the way one
//! addresses a multi-dimensional array: fix some key positions to exact
//! values, leave others ranged with half-open bounds, and receive either a
//! stored value (everything pinned) or a narrower view (at least one range
//! left). It depends on `keyspace` only for shared types (KeyValue, Key,
//! KeyStore).
//!
//! Layers:
//! - `definition`: Serializable slice specifications (what the slice IS)
//! - `predicate`: Pure membership and projection tests (HOW keys match)
//! - `view`: Lazy, unordered views (WHAT a lookup resolves to)
//! - `cache`: Sorted per-dimension caches for table-like iteration

pub mod cache;
pub mod definition;
pub mod error;
pub mod predicate;
pub mod view;

pub use cache::CachedSliceView;
pub use definition::{Bounds, SliceEntry, SliceSpec};
pub use error::SliceError;
pub use predicate::{in_slice, project};
pub use view::{SliceRead, SliceResult, SliceView};
