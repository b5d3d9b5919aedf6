//! Nesting discipline enforcement.
//!
//! [`NestingValidator`] sits in front of any receiver and turns contract
//! violations into errors instead of letting them corrupt downstream state.

use tracing::warn;

use recflow_foundation::{Error, ErrorContext, Result, StreamLimit};

use crate::receiver::{StreamPipe, StreamReceiver};

// =============================================================================
// Limits
// =============================================================================

/// Resource limits for a single record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamLimits {
    /// Maximum number of simultaneously open entities.
    pub max_entity_depth: usize,
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            max_entity_depth: 64,
        }
    }
}

impl StreamLimits {
    /// Limits that never trigger.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_entity_depth: usize::MAX,
        }
    }

    /// Builder method to set the maximum entity depth.
    #[must_use]
    pub fn with_max_entity_depth(mut self, depth: usize) -> Self {
        self.max_entity_depth = depth;
        self
    }
}

// =============================================================================
// Nesting Validator
// =============================================================================

/// Forwards events while enforcing the nesting discipline.
///
/// Raises `EventOutsideRecord` for entity and literal events with no open
/// record, `NestedRecord` for a second `start_record`, `EntityUnderflow` for
/// an `end_entity` with nothing open, `UnclosedEntities` for an
/// `end_record` with entities still open, and `LimitExceeded` when the open
/// entity count would pass [`StreamLimits::max_entity_depth`].
///
/// A reset or close with an open record first emits the missing
/// `end_entity` calls and one `end_record`, then propagates the signal.
#[derive(Debug)]
pub struct NestingValidator<R> {
    receiver: R,
    limits: StreamLimits,
    record: Option<String>,
    entities: Vec<String>,
}

impl<R: StreamReceiver> NestingValidator<R> {
    /// Creates a validator with default limits.
    pub fn new(receiver: R) -> Self {
        Self::with_limits(receiver, StreamLimits::default())
    }

    /// Creates a validator with explicit limits.
    pub fn with_limits(receiver: R, limits: StreamLimits) -> Self {
        Self {
            receiver,
            limits,
            record: None,
            entities: Vec::new(),
        }
    }

    /// Returns the active limits.
    #[must_use]
    pub fn limits(&self) -> &StreamLimits {
        &self.limits
    }

    /// Returns the identifier of the open record, if any.
    #[must_use]
    pub fn open_record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Returns the number of open entities.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entities.len()
    }

    fn context(&self) -> ErrorContext {
        let mut context = ErrorContext::new().with_source("nesting validator");
        if let Some(id) = &self.record {
            context = context.with_record(id.clone());
        }
        for name in &self.entities {
            context = context.with_frame(name.clone());
        }
        context
    }

    fn require_record(&self, event: &str) -> Result<()> {
        if self.record.is_none() {
            return Err(Error::outside_record(event).with_context(self.context()));
        }
        Ok(())
    }

    fn force_close(&mut self) -> Result<()> {
        let Some(id) = self.record.take() else {
            return Ok(());
        };
        warn!(record = %id, open_entities = self.entities.len(), "force-closing open record");
        let open = std::mem::take(&mut self.entities);
        for _ in open {
            self.receiver.end_entity()?;
        }
        self.receiver.end_record()
    }
}

impl<R: StreamReceiver> StreamReceiver for NestingValidator<R> {
    fn start_record(&mut self, id: &str) -> Result<()> {
        if self.record.is_some() {
            return Err(Error::nested_record(id).with_context(self.context()));
        }
        self.record = Some(id.to_owned());
        self.receiver.start_record(id)
    }

    fn end_record(&mut self) -> Result<()> {
        self.require_record("end-record")?;
        if !self.entities.is_empty() {
            return Err(Error::unclosed_entities(self.entities.len()).with_context(self.context()));
        }
        self.record = None;
        self.receiver.end_record()
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        self.require_record("start-entity")?;
        if self.entities.len() >= self.limits.max_entity_depth {
            return Err(Error::limit_exceeded(StreamLimit::MaxEntityDepth {
                limit: self.limits.max_entity_depth,
                entity: Some(name.to_owned()),
            })
            .with_context(self.context()));
        }
        self.entities.push(name.to_owned());
        self.receiver.start_entity(name)
    }

    fn end_entity(&mut self) -> Result<()> {
        self.require_record("end-entity")?;
        if self.entities.pop().is_none() {
            return Err(Error::entity_underflow().with_context(self.context()));
        }
        self.receiver.end_entity()
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        self.require_record("literal")?;
        self.receiver.literal(name, value)
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.force_close()?;
        self.receiver.reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        self.force_close()?;
        self.receiver.close_stream()
    }
}

impl<R: StreamReceiver> StreamPipe for NestingValidator<R> {
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
