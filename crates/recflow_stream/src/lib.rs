//! Event-stream contract and stream stages for recflow.
//!
//! This crate provides:
//! - [`StreamReceiver`] / [`StreamPipe`] - The push-based event contract
//! - [`StreamEvent`] - Events as values, for storage and replay
//! - [`StreamBuffer`] - Deferred replay of a record's events
//! - [`Filter`] - Whole-record pass/drop driven by a decision pipe
//! - [`NestingValidator`] - Contract enforcement with depth limits
//! - [`RecordBuilder`] / [`RecordEmitter`] - Events to records and back

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buffer;
pub mod event;
pub mod filter;
pub mod receiver;
pub mod record_builder;
pub mod validator;

pub use buffer::StreamBuffer;
pub use event::StreamEvent;
pub use filter::Filter;
pub use receiver::{EventCollector, NullReceiver, SingleValue, StreamPipe, StreamReceiver};
pub use record_builder::{ARRAY_MARKER, RecordBuilder, RecordEmitter, is_array_name};
pub use validator::{NestingValidator, StreamLimits};
