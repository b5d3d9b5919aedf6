//! Type descriptors for the value model.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The variant of a [`Value`](crate::Value).
///
/// The value model is closed: these three kinds are the only ones a record
/// can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// A text leaf.
    String,
    /// An ordered sequence of values.
    Array,
    /// An ordered mapping from field name to value.
    Hash,
}

impl ValueKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Hash => "hash",
        }
    }

    /// Returns true for the two container kinds.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Hash)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
