//! Records: identified, hash-rooted value trees.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::FieldMap;
use crate::value::Value;

/// One top-level unit of data flowing through a pipeline.
///
/// A record is a hash of fields plus an identifier. It is created when a
/// stage sees `start-record`, filled in place while events arrive, and
/// finished on the matching `end-record`. The value tree is owned by the
/// record and never shared with another one.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    id: Arc<str>,
    fields: FieldMap<Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            fields: FieldMap::new(),
        }
    }

    /// Creates a record from existing fields.
    #[must_use]
    pub fn with_fields(id: impl Into<Arc<str>>, fields: FieldMap<Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the top-level fields.
    #[must_use]
    pub fn fields(&self) -> &FieldMap<Value> {
        &self.fields
    }

    /// Returns the top-level fields for in-place mutation.
    pub fn fields_mut(&mut self) -> &mut FieldMap<Value> {
        &mut self.fields
    }

    /// Gets a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a top-level field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key, value.into())
    }

    /// Adds a top-level field with repeated-field semantics.
    pub fn add_field(&mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.fields.add_field(key, value.into());
    }

    /// Removes a top-level field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the record as a hash value, dropping the identifier.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Hash(self.fields.clone())
    }

    /// Splits the record into identifier and fields.
    #[must_use]
    pub fn into_parts(self) -> (Arc<str>, FieldMap<Value>) {
        (self.id, self.fields)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({:?}, {:?})", &*self.id, self.fields)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, Value::Hash(self.fields.clone()))
    }
}
