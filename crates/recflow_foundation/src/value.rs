//! Core value type for all record data.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::{FieldMap, List};
use crate::types::ValueKind;

/// Core value type for all record data.
///
/// The union is closed: a value is a string leaf, an array, or a hash, and
/// every consumer matches all three. Values are cheaply cloneable; arrays and
/// hashes share structure through persistent collections.
///
/// Equality is structural. Strings compare by text, arrays elementwise in
/// order, hashes by key set and values regardless of key order. Values of
/// different variants are never equal.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// Text leaf.
    String(Arc<str>),
    /// Ordered sequence.
    Array(List<Value>),
    /// Ordered mapping with unique keys.
    Hash(FieldMap<Value>),
}

impl Value {
    /// Creates an empty array value.
    #[must_use]
    pub fn new_array() -> Self {
        Self::Array(List::new())
    }

    /// Creates an empty hash value.
    #[must_use]
    pub fn new_hash() -> Self {
        Self::Hash(FieldMap::new())
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Hash(_) => ValueKind::Hash,
        }
    }

    /// Returns true if this value is a string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this value is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns true if this value is a hash.
    #[must_use]
    pub const fn is_hash(&self) -> bool {
        matches!(self, Self::Hash(_))
    }

    /// Returns true for the empty string, an empty array, or an empty hash.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Array(a) => a.is_empty(),
            Self::Hash(h) => h.is_empty(),
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an array reference.
    #[must_use]
    pub const fn as_array(&self) -> Option<&List<Value>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to extract a hash reference.
    #[must_use]
    pub const fn as_hash(&self) -> Option<&FieldMap<Value>> {
        match self {
            Self::Hash(h) => Some(h),
            _ => None,
        }
    }

    /// Attempts to extract a mutable hash reference.
    pub fn as_hash_mut(&mut self) -> Option<&mut FieldMap<Value>> {
        match self {
            Self::Hash(h) => Some(h),
            _ => None,
        }
    }

    /// Attempts to extract a mutable array reference.
    pub fn as_array_mut(&mut self) -> Option<&mut List<Value>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Dispatches on the variant, invoking exactly one handler.
    pub fn match_type<T>(
        &self,
        on_string: impl FnOnce(&str) -> T,
        on_array: impl FnOnce(&List<Value>) -> T,
        on_hash: impl FnOnce(&FieldMap<Value>) -> T,
    ) -> T {
        match self {
            Self::String(s) => on_string(s),
            Self::Array(a) => on_array(a),
            Self::Hash(h) => on_hash(h),
        }
    }

    /// Starts a partial dispatch that produces a typed result.
    ///
    /// Handlers are registered per variant; the variant without a handler
    /// falls through to [`TypeMatcher::or_else`].
    ///
    /// ```
    /// use recflow_foundation::Value;
    ///
    /// let v = Value::from("x");
    /// let is_text = v.extract_type().if_string(|_| true).or_else(|_| false);
    /// assert!(is_text);
    /// ```
    #[must_use]
    pub fn extract_type<T>(&self) -> TypeMatcher<'_, T> {
        TypeMatcher {
            value: self,
            result: None,
        }
    }

    /// Collects the string leaves reachable through nested arrays.
    ///
    /// A string yields itself, an array yields the leaves of its elements in
    /// order, and a hash yields nothing.
    #[must_use]
    pub fn flatten_strings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_strings(&mut out);
        out
    }

    fn collect_strings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::String(s) => out.push(s),
            Self::Array(a) => {
                for item in a {
                    item.collect_strings(out);
                }
            }
            Self::Hash(_) => {}
        }
    }
}

/// Partial variant dispatch built by [`Value::extract_type`].
#[must_use]
pub struct TypeMatcher<'a, T> {
    value: &'a Value,
    result: Option<T>,
}

impl<'a, T> TypeMatcher<'a, T> {
    /// Handles the string variant.
    pub fn if_string(mut self, handler: impl FnOnce(&'a str) -> T) -> Self {
        if self.result.is_none() {
            if let Value::String(s) = self.value {
                self.result = Some(handler(s));
            }
        }
        self
    }

    /// Handles the array variant.
    pub fn if_array(mut self, handler: impl FnOnce(&'a List<Value>) -> T) -> Self {
        if self.result.is_none() {
            if let Value::Array(a) = self.value {
                self.result = Some(handler(a));
            }
        }
        self
    }

    /// Handles the hash variant.
    pub fn if_hash(mut self, handler: impl FnOnce(&'a FieldMap<Value>) -> T) -> Self {
        if self.result.is_none() {
            if let Value::Hash(h) = self.value {
                self.result = Some(handler(h));
            }
        }
        self
    }

    /// Finishes the dispatch, using `fallback` when no handler matched.
    pub fn or_else(self, fallback: impl FnOnce(&'a Value) -> T) -> T {
        match self.result {
            Some(result) => result,
            None => fallback(self.value),
        }
    }
}

impl FieldMap<Value> {
    /// Adds a field with repeated-field semantics.
    ///
    /// A new key is inserted as-is. When the key already exists, its value
    /// becomes an array holding the old and the new value; an existing array
    /// is extended instead.
    pub fn add_field(&mut self, key: impl Into<Arc<str>>, value: Value) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(Value::Array(items)) => items.push_back(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::new_array());
                *existing = Value::Array([first, value].into_iter().collect());
            }
            None => {
                self.insert(key, value);
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(a) => write!(f, "{a:?}"),
            Self::Hash(h) => write!(f, "{h:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Array(a) => {
                write!(f, "[")?;
                for (i, item) in a.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Hash(h) => {
                write!(f, "{{")?;
                for (i, (k, v)) in h.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Convenience From implementations

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<List<Value>> for Value {
    fn from(a: List<Value>) -> Self {
        Self::Array(a)
    }
}

impl From<FieldMap<Value>> for Value {
    fn from(h: FieldMap<Value>) -> Self {
        Self::Hash(h)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}
