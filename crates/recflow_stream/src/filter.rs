//! Record filtering driven by a decision pipe.
//!
//! A [`Filter`] feeds every record event both to an internal
//! [`StreamBuffer`] and to a decision pipe whose terminal receiver is a
//! [`SingleValue`]. When the record ends, the buffered events are replayed
//! downstream only if the decision pipe produced a non-empty value.

use tracing::debug;

use recflow_foundation::Result;

use crate::buffer::StreamBuffer;
use crate::receiver::{SingleValue, StreamPipe, StreamReceiver};

/// Passes or drops whole records.
#[derive(Debug)]
pub struct Filter<P, R> {
    decision: P,
    buffer: StreamBuffer<R>,
    current: Option<String>,
    passed: u64,
    dropped: u64,
}

impl<P, R> Filter<P, R>
where
    P: StreamPipe<Receiver = SingleValue>,
    R: StreamReceiver,
{
    /// Creates a filter that decides with `decision` and forwards passing
    /// records to `receiver`.
    pub fn new(decision: P, receiver: R) -> Self {
        Self {
            decision,
            buffer: StreamBuffer::new(receiver),
            current: None,
            passed: 0,
            dropped: 0,
        }
    }

    /// Returns the number of records forwarded so far.
    #[must_use]
    pub const fn records_passed(&self) -> u64 {
        self.passed
    }

    /// Returns the number of records dropped so far.
    #[must_use]
    pub const fn records_dropped(&self) -> u64 {
        self.dropped
    }

    /// Returns the decision pipe.
    #[must_use]
    pub fn decision(&self) -> &P {
        &self.decision
    }

    fn dispatch(&mut self) -> Result<()> {
        let id = self.current.take().unwrap_or_default();
        let outcome = if self.decision.receiver().value().is_empty() {
            self.dropped += 1;
            debug!(record = %id, "filter dropped record");
            Ok(())
        } else {
            self.passed += 1;
            debug!(record = %id, "filter passed record");
            self.buffer.replay()
        };
        self.buffer.clear();
        outcome
    }

    /// Forgets the partial record and any decision taken for it.
    fn discard(&mut self) {
        self.current = None;
        self.buffer.clear();
        self.decision.receiver_mut().clear();
    }

    /// Discards the partial record when `outcome` is an error.
    fn guard(&mut self, outcome: Result<()>) -> Result<()> {
        if let Err(err) = &outcome {
            debug!(record = ?self.current, error = %err, "filter discarded failing record");
            self.discard();
        }
        outcome
    }
}

impl<P, R> StreamReceiver for Filter<P, R>
where
    P: StreamPipe<Receiver = SingleValue>,
    R: StreamReceiver,
{
    fn start_record(&mut self, id: &str) -> Result<()> {
        // A decision pipe may withhold a record entirely; start undecided.
        self.discard();
        self.current = Some(id.to_owned());
        let outcome = self
            .buffer
            .start_record(id)
            .and_then(|()| self.decision.start_record(id));
        self.guard(outcome)
    }

    fn end_record(&mut self) -> Result<()> {
        let outcome = self
            .buffer
            .end_record()
            .and_then(|()| self.decision.end_record());
        self.guard(outcome)?;
        self.dispatch()
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        let outcome = self
            .buffer
            .start_entity(name)
            .and_then(|()| self.decision.start_entity(name));
        self.guard(outcome)
    }

    fn end_entity(&mut self) -> Result<()> {
        let outcome = self
            .buffer
            .end_entity()
            .and_then(|()| self.decision.end_entity());
        self.guard(outcome)
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        let outcome = self
            .buffer
            .literal(name, value)
            .and_then(|()| self.decision.literal(name, value));
        self.guard(outcome)
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.discard();
        self.decision.reset_stream()?;
        self.buffer.reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        self.discard();
        self.decision.close_stream()?;
        self.buffer.close_stream()
    }
}

impl<P, R> StreamPipe for Filter<P, R>
where
    P: StreamPipe<Receiver = SingleValue>,
    R: StreamReceiver,
{
    type Receiver = R;

    fn receiver(&self) -> &R {
        self.buffer.receiver()
    }

    fn receiver_mut(&mut self) -> &mut R {
        self.buffer.receiver_mut()
    }

    fn into_receiver(self) -> R {
        self.buffer.into_receiver()
    }
}
