//! Stream events as values.
//!
//! [`StreamEvent`] mirrors the calls of [`StreamReceiver`] so that a
//! sequence of events can be stored, compared, and replayed later.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use recflow_foundation::Result;

use crate::receiver::StreamReceiver;

// =============================================================================
// Stream Event
// =============================================================================

/// One call on the event-stream contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StreamEvent {
    /// Opens a record with the given identifier.
    StartRecord(Arc<str>),
    /// Closes the open record.
    EndRecord,
    /// Opens a named entity.
    StartEntity(Arc<str>),
    /// Closes the innermost open entity.
    EndEntity,
    /// A leaf name/value pair.
    Literal {
        /// Field name.
        name: Arc<str>,
        /// Field value.
        value: Arc<str>,
    },
    /// Discards all in-flight state.
    ResetStream,
    /// Ends the stream.
    CloseStream,
}

impl StreamEvent {
    /// Creates a start-record event.
    #[must_use]
    pub fn start_record(id: impl Into<Arc<str>>) -> Self {
        Self::StartRecord(id.into())
    }

    /// Creates a start-entity event.
    #[must_use]
    pub fn start_entity(name: impl Into<Arc<str>>) -> Self {
        Self::StartEntity(name.into())
    }

    /// Creates a literal event.
    #[must_use]
    pub fn literal(name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self::Literal {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true for events that belong inside a record stream, that is
    /// everything except the two stream signals.
    #[must_use]
    pub const fn is_record_event(&self) -> bool {
        !matches!(self, Self::ResetStream | Self::CloseStream)
    }

    /// Returns the contract name of this event.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::StartRecord(_) => "start-record",
            Self::EndRecord => "end-record",
            Self::StartEntity(_) => "start-entity",
            Self::EndEntity => "end-entity",
            Self::Literal { .. } => "literal",
            Self::ResetStream => "reset-stream",
            Self::CloseStream => "close-stream",
        }
    }

    /// Delivers this event to a receiver.
    ///
    /// # Errors
    ///
    /// Returns whatever the receiver returns.
    pub fn dispatch<R: StreamReceiver + ?Sized>(&self, receiver: &mut R) -> Result<()> {
        match self {
            Self::StartRecord(id) => receiver.start_record(id),
            Self::EndRecord => receiver.end_record(),
            Self::StartEntity(name) => receiver.start_entity(name),
            Self::EndEntity => receiver.end_entity(),
            Self::Literal { name, value } => receiver.literal(name, value),
            Self::ResetStream => receiver.reset_stream(),
            Self::CloseStream => receiver.close_stream(),
        }
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartRecord(id) => write!(f, "start-record({id})"),
            Self::StartEntity(name) => write!(f, "start-entity({name})"),
            Self::Literal { name, value } => write!(f, "literal({name}={value})"),
            other => f.write_str(other.kind_name()),
        }
    }
}
