//! Integration tests for Layer 3: Triples
//!
//! Tests for triple grouping and nested-structure decoding.

mod collect;
