//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, Record, WildcardTrie, Error, and ordered collections.

mod collections;
mod errors;
mod values;
