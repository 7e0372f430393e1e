//! FILENAME: slice-engine/src/error.rs

use keyspace::Key;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SliceError {
    /// A fully pinned lookup addressed a key the backing store does not hold.
    #[error("key not found: {0}")]
    MissingKey(Key),

    /// The caller supplied the wrong number of selectors: one is required
    /// for each dimension still ranged in the current specification.
    #[error("selector arity mismatch: {expected} ranged dimension(s), {supplied} selector(s) supplied")]
    ArityMismatch { expected: usize, supplied: usize },
}
