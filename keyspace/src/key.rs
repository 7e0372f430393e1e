//! FILENAME: keyspace/src/key.rs
//! PURPOSE: Defines the composite key type used by backing stores.
//! CONTEXT: A `Key` is an ordered sequence of scalar values. A scalar key
//! is simply the key of arity 1, so a bare value and the 1-tuple holding it
//! address the same stored entry. Keys compare lexicographically.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::value::KeyValue;

/// A composite key: an ordered sequence of scalar values.
/// Most keys are short, so the parts are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key(SmallVec<[KeyValue; 4]>);

impl Key {
    /// Builds a key of arity 1 from a single scalar.
    pub fn scalar(value: impl Into<KeyValue>) -> Self {
        let mut parts = SmallVec::new();
        parts.push(value.into());
        Key(parts)
    }

    /// Builds a key from its parts, in dimension order.
    pub fn from_parts(parts: impl IntoIterator<Item = KeyValue>) -> Self {
        Key(parts.into_iter().collect())
    }

    /// Number of dimensions this key spans.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// The value at one dimension, or None past the end of the key.
    pub fn part(&self, dim: usize) -> Option<&KeyValue> {
        self.0.get(dim)
    }

    /// All parts in dimension order.
    pub fn parts(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyValue> {
        self.0.iter()
    }

    /// The sole value of an arity-1 key, or None otherwise.
    pub fn as_scalar(&self) -> Option<&KeyValue> {
        if self.0.len() == 1 {
            self.0.first()
        } else {
            None
        }
    }

    /// Consumes an arity-1 key into its sole value, or None otherwise.
    pub fn into_scalar(mut self) -> Option<KeyValue> {
        if self.0.len() == 1 {
            self.0.pop()
        } else {
            None
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.as_scalar() {
            return write!(f, "{}", value);
        }
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

impl From<KeyValue> for Key {
    fn from(value: KeyValue) -> Self {
        Key::scalar(value)
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::scalar(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::scalar(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::scalar(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::scalar(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::scalar(value)
    }
}

impl From<char> for Key {
    fn from(value: char) -> Self {
        Key::scalar(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::scalar(value)
    }
}

impl<A: Into<KeyValue>, B: Into<KeyValue>> From<(A, B)> for Key {
    fn from((a, b): (A, B)) -> Self {
        Key::from_parts([a.into(), b.into()])
    }
}

impl<A: Into<KeyValue>, B: Into<KeyValue>, C: Into<KeyValue>> From<(A, B, C)> for Key {
    fn from((a, b, c): (A, B, C)) -> Self {
        Key::from_parts([a.into(), b.into(), c.into()])
    }
}

impl<A: Into<KeyValue>, B: Into<KeyValue>, C: Into<KeyValue>, D: Into<KeyValue>> From<(A, B, C, D)>
    for Key
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Key::from_parts([a.into(), b.into(), c.into(), d.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_arity_one_key_are_identical() {
        let scalar = Key::from(5);
        let tuple = Key::from_parts([KeyValue::from(5)]);
        assert_eq!(scalar, tuple);
        assert_eq!(scalar.arity(), 1);
        assert_eq!(scalar.as_scalar(), Some(&KeyValue::from(5)));
    }

    #[test]
    fn test_keys_order_lexicographically() {
        let mut keys = vec![
            Key::from((2, 'a')),
            Key::from((1, 'b')),
            Key::from((1, 'a')),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                Key::from((1, 'a')),
                Key::from((1, 'b')),
                Key::from((2, 'a')),
            ]
        );
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Key::from(1).to_string(), "1");
        assert_eq!(Key::from((1, 'a')).to_string(), "(1, a)");
    }

    #[test]
    fn test_serde_round_trip() {
        let key = Key::from((1, "north", 3.5));
        let json = serde_json::to_string(&key).unwrap();
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
