//! Core values, ordered collections, wildcard trie, and errors for recflow.
//!
//! This crate provides:
//! - [`Value`] - The closed value model (string, array, hash)
//! - [`Record`] - An identified, hash-rooted value tree
//! - [`WildcardTrie`] - Pattern index with `*`, `?`, and `|` syntax
//! - [`ValueKind`] - Variant descriptors returned by `Value::kind`
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`List`], [`FieldMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod record;
pub mod trie;
pub mod types;
pub mod value;

pub use collections::{FieldMap, List};
pub use error::{Error, ErrorContext, ErrorKind, Result, StreamLimit};
pub use record::Record;
pub use trie::{LookupScratch, NodeId, WildcardTrie, has_wildcard};
pub use types::ValueKind;
pub use value::{TypeMatcher, Value};
