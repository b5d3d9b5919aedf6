//! Subject/predicate/object statements.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the object of a triple is encoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectType {
    /// Plain text, decoded as a single literal.
    String,
    /// Nested-structure text, decoded into entities and literals.
    Entity,
    /// Any other tag. Decoding such a triple is an error.
    Other(Arc<str>),
}

impl ObjectType {
    /// Classifies a type tag, ignoring letter case for the known tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("STRING") {
            Self::String
        } else if tag.eq_ignore_ascii_case("ENTITY") {
            Self::Entity
        } else {
            Self::Other(tag.into())
        }
    }

    /// Returns the type tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::String => "STRING",
            Self::Entity => "ENTITY",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A statement about a subject.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triple {
    /// Grouping key; becomes the record identifier.
    pub subject: Arc<str>,
    /// Field name.
    pub predicate: Arc<str>,
    /// Field content, interpreted according to `object_type`.
    pub object: Arc<str>,
    /// Encoding of `object`.
    pub object_type: ObjectType,
}

impl Triple {
    /// Creates a triple with a plain text object.
    #[must_use]
    pub fn new(
        subject: impl Into<Arc<str>>,
        predicate: impl Into<Arc<str>>,
        object: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            object_type: ObjectType::String,
        }
    }

    /// Creates a triple whose object is nested-structure text.
    #[must_use]
    pub fn entity(
        subject: impl Into<Arc<str>>,
        predicate: impl Into<Arc<str>>,
        object: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(subject, predicate, object).with_object_type(ObjectType::Entity)
    }

    /// Replaces the object type.
    #[must_use]
    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {:?}, {})",
            self.subject, self.predicate, self.object, self.object_type
        )
    }
}
