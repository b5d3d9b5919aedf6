//! Triple grouping and nested-structure decoding for recflow.
//!
//! This crate provides:
//! - [`Triple`] - Subject/predicate/object statements with an object type
//! - [`TripleCollect`] - Groups subject runs into records
//! - [`FormetaParser`] - Decodes nested-structure object text into events

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collect;
pub mod formeta;
pub mod triple;

pub use collect::TripleCollect;
pub use formeta::{FormetaParser, MAX_NESTING_DEPTH};
pub use triple::{ObjectType, Triple};
