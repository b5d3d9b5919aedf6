//! The event-stream contract and its basic receivers.
//!
//! Every stage in a pipeline implements [`StreamReceiver`]. Stages that
//! forward to a downstream receiver also implement [`StreamPipe`], which
//! gives access to the receiver they own.
//!
//! Events must arrive in contract order: a record opens with
//! `start_record`, entities nest like a tree, and every `start_entity` has
//! exactly one `end_entity` before its scope closes. `reset_stream` and
//! `close_stream` may arrive at any time.

use tracing::warn;

use recflow_foundation::Result;

use crate::event::StreamEvent;

// =============================================================================
// Contract
// =============================================================================

/// Consumer of a well-nested event stream.
pub trait StreamReceiver {
    /// Opens a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver detects a contract violation.
    fn start_record(&mut self, id: &str) -> Result<()>;

    /// Closes the open record.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver detects a contract violation.
    fn end_record(&mut self) -> Result<()>;

    /// Opens a named entity inside the current record.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver detects a contract violation.
    fn start_entity(&mut self, name: &str) -> Result<()>;

    /// Closes the innermost open entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver detects a contract violation.
    fn end_entity(&mut self) -> Result<()>;

    /// Delivers a leaf name/value pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver detects a contract violation.
    fn literal(&mut self, name: &str, value: &str) -> Result<()>;

    /// Discards in-flight state. Sinks without state may keep the default.
    ///
    /// # Errors
    ///
    /// Returns an error if a downstream stage fails while closing.
    fn reset_stream(&mut self) -> Result<()> {
        Ok(())
    }

    /// Ends the stream. Sinks without state may keep the default.
    ///
    /// # Errors
    ///
    /// Returns an error if a downstream stage fails while closing.
    fn close_stream(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A stage that owns a downstream receiver.
pub trait StreamPipe: StreamReceiver {
    /// The downstream receiver type.
    type Receiver: StreamReceiver;

    /// Returns the downstream receiver.
    fn receiver(&self) -> &Self::Receiver;

    /// Returns the downstream receiver mutably.
    fn receiver_mut(&mut self) -> &mut Self::Receiver;

    /// Consumes the stage and returns the downstream receiver.
    fn into_receiver(self) -> Self::Receiver
    where
        Self: Sized;
}

impl<R: StreamReceiver + ?Sized> StreamReceiver for &mut R {
    fn start_record(&mut self, id: &str) -> Result<()> {
        (**self).start_record(id)
    }

    fn end_record(&mut self) -> Result<()> {
        (**self).end_record()
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        (**self).start_entity(name)
    }

    fn end_entity(&mut self) -> Result<()> {
        (**self).end_entity()
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).literal(name, value)
    }

    fn reset_stream(&mut self) -> Result<()> {
        (**self).reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        (**self).close_stream()
    }
}

impl<R: StreamReceiver + ?Sized> StreamReceiver for Box<R> {
    fn start_record(&mut self, id: &str) -> Result<()> {
        (**self).start_record(id)
    }

    fn end_record(&mut self) -> Result<()> {
        (**self).end_record()
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        (**self).start_entity(name)
    }

    fn end_entity(&mut self) -> Result<()> {
        (**self).end_entity()
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).literal(name, value)
    }

    fn reset_stream(&mut self) -> Result<()> {
        (**self).reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        (**self).close_stream()
    }
}

// =============================================================================
// Event Collector
// =============================================================================

/// Records every event it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct EventCollector {
    events: Vec<StreamEvent>,
}

impl EventCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected events.
    #[must_use]
    pub fn events(&self) -> &[StreamEvent] {
        &self.events
    }

    /// Takes the collected events, leaving the collector empty.
    pub fn take(&mut self) -> Vec<StreamEvent> {
        std::mem::take(&mut self.events)
    }

    /// Consumes the collector and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<StreamEvent> {
        self.events
    }

    /// Returns the identifiers of every record started, in order.
    #[must_use]
    pub fn record_ids(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::StartRecord(id) => Some(&**id),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of events collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl StreamReceiver for EventCollector {
    fn start_record(&mut self, id: &str) -> Result<()> {
        self.events.push(StreamEvent::start_record(id));
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        self.events.push(StreamEvent::EndRecord);
        Ok(())
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        self.events.push(StreamEvent::start_entity(name));
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        self.events.push(StreamEvent::EndEntity);
        Ok(())
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        self.events.push(StreamEvent::literal(name, value));
        Ok(())
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.events.push(StreamEvent::ResetStream);
        Ok(())
    }

    fn close_stream(&mut self) -> Result<()> {
        self.events.push(StreamEvent::CloseStream);
        Ok(())
    }
}

// =============================================================================
// Null Receiver
// =============================================================================

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReceiver;

impl StreamReceiver for NullReceiver {
    fn start_record(&mut self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_entity(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        Ok(())
    }

    fn literal(&mut self, _name: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Single Value
// =============================================================================

/// Captures the value of the last literal seen in the current record.
///
/// Used as the terminal receiver of a filter's decision pipe: the record
/// passes when the captured value is non-empty.
#[derive(Clone, Debug, Default)]
pub struct SingleValue {
    value: String,
    closed: bool,
}

impl SingleValue {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured value, or `""` if no literal arrived.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true once the stream has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Forgets the captured value.
    pub fn clear(&mut self) {
        self.value.clear();
    }
}

impl StreamReceiver for SingleValue {
    fn start_record(&mut self, _id: &str) -> Result<()> {
        self.clear();
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_entity(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        Ok(())
    }

    fn literal(&mut self, _name: &str, value: &str) -> Result<()> {
        if self.closed {
            warn!("literal after close-stream ignored");
            return Ok(());
        }
        value.clone_into(&mut self.value);
        Ok(())
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.clear();
        self.closed = false;
        Ok(())
    }

    fn close_stream(&mut self) -> Result<()> {
        self.clear();
        self.closed = true;
        Ok(())
    }
}
