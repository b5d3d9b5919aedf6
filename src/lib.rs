//! recflow - Streaming transformation engine for hierarchical metadata records
//!
//! This crate re-exports all layers of the recflow system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: recflow_triples    - Triple grouping, nested-structure parser
//! Layer 2: recflow_engine     - Paths, predicates, rules, rule stage
//! Layer 1: recflow_stream     - Event contract, buffer, filter, record builder
//! Layer 0: recflow_foundation - Core types (Value, Record, WildcardTrie, Error)
//! ```

pub use recflow_engine as engine;
pub use recflow_foundation as foundation;
pub use recflow_stream as stream;
pub use recflow_triples as triples;
