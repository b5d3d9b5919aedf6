//! Record-event buffering with deferred replay.
//!
//! A [`StreamBuffer`] holds back the events of a record until its owner
//! decides whether to forward them. The stream signals are never stored:
//! they clear the buffer and go straight downstream.

use recflow_foundation::Result;

use crate::event::StreamEvent;
use crate::receiver::{StreamPipe, StreamReceiver};

// =============================================================================
// Stream Buffer
// =============================================================================

/// Stores record events verbatim and replays them on demand.
#[derive(Clone, Debug)]
pub struct StreamBuffer<R> {
    /// Stored events, oldest first.
    events: Vec<StreamEvent>,
    receiver: R,
}

impl<R: StreamReceiver> StreamBuffer<R> {
    /// Creates an empty buffer in front of `receiver`.
    pub fn new(receiver: R) -> Self {
        Self {
            events: Vec::new(),
            receiver,
        }
    }

    /// Forwards every stored event, in order, to the receiver.
    ///
    /// The buffer keeps its contents; call [`clear`](Self::clear) once the
    /// replay is consumed.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first downstream error.
    pub fn replay(&mut self) -> Result<()> {
        for event in &self.events {
            event.dispatch(&mut self.receiver)?;
        }
        Ok(())
    }

    /// Discards all stored events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns the number of stored events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[StreamEvent] {
        &self.events
    }
}

impl<R: StreamReceiver> StreamReceiver for StreamBuffer<R> {
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
        self.clear();
        self.receiver.reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        self.clear();
        self.receiver.close_stream()
    }
}

impl<R: StreamReceiver> StreamPipe for StreamBuffer<R> {
    type Receiver = R;

    fn receiver(&self) -> &R {
        &self.receiver
    }

    fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    fn into_receiver(self) -> R {
        self.receiver
    }
}
