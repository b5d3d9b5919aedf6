//! Path resolution, conditional predicates, and rule stages for recflow.
//!
//! This crate provides:
//! - [`Path`] - Dot-separated locators with indices and wildcards
//! - [`Conditional`] - The predicate library used by guards
//! - [`Rule`] / [`RuleSet`] - Pattern-indexed mapping rules
//! - [`RuleStage`] - Stream stage applying rules per record
//! - [`EngineConfig`] - Emission, boolean, and nesting settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod path;
pub mod predicate;
pub mod rule;

pub use config::EngineConfig;
pub use path::{Path, Segment, exists, resolve, resolve_str};
pub use predicate::{Conditional, Options, contained_in, is_number, parse_bool};
pub use rule::{Guard, Rule, RuleId, RuleSet, RuleStage, literal_paths};
