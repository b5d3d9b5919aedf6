//! Conversion between event streams and materialized records.
//!
//! [`RecordBuilder`] folds events into [`Record`]s; [`RecordEmitter`] turns a
//! record back into events. Entity names ending in [`ARRAY_MARKER`] denote
//! arrays on both sides.

use std::collections::VecDeque;

use recflow_foundation::{Error, ErrorContext, ErrorKind, FieldMap, Record, Result, Value};

use crate::receiver::StreamReceiver;

/// Suffix that marks an entity as an array.
pub const ARRAY_MARKER: &str = "[]";

/// Returns true if an entity with this name materializes as an array.
#[must_use]
pub fn is_array_name(name: &str) -> bool {
    name.ends_with(ARRAY_MARKER)
}

// =============================================================================
// Record Builder
// =============================================================================

#[derive(Clone, Debug)]
struct Frame {
    name: String,
    value: Value,
}

/// Materializes events into records.
///
/// Literals and entities are added to the enclosing container with
/// repeated-field semantics: a second field with the same name turns the
/// first into an array. Children of an array entity are appended in order
/// and their names are ignored.
#[derive(Clone, Debug, Default)]
pub struct RecordBuilder {
    current: Option<Record>,
    stack: Vec<Frame>,
    finished: VecDeque<Record>,
}

impl RecordBuilder {
    /// Creates an idle builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a record is being built.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Returns the number of open entities.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the record being built, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    /// Takes the oldest finished record.
    pub fn take_record(&mut self) -> Option<Record> {
        self.finished.pop_front()
    }

    /// Drains every finished record, oldest first.
    pub fn finished(&mut self) -> impl Iterator<Item = Record> + '_ {
        self.finished.drain(..)
    }

    fn context(&self) -> ErrorContext {
        let mut context = ErrorContext::new().with_source("record builder");
        if let Some(record) = &self.current {
            context = context.with_record(record.id());
        }
        for frame in &self.stack {
            context = context.with_frame(frame.name.clone());
        }
        context
    }

    fn attach(&mut self, name: &str, value: Value) -> Result<()> {
        if let Some(frame) = self.stack.last_mut() {
            return match &mut frame.value {
                Value::Hash(map) => {
                    map.add_field(name, value);
                    Ok(())
                }
                Value::Array(list) => {
                    list.push_back(value);
                    Ok(())
                }
                Value::String(_) => Err(Error::new(ErrorKind::Internal(format!(
                    "entity frame {} holds a string",
                    frame.name
                )))),
            };
        }
        match &mut self.current {
            Some(record) => {
                record.add_field(name, value);
                Ok(())
            }
            None => Err(Error::new(ErrorKind::Internal(
                "attach without open record".to_owned(),
            ))),
        }
    }

    fn require_record(&self, event: &str) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::outside_record(event).with_context(self.context()));
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.current = None;
        self.stack.clear();
    }
}

impl StreamReceiver for RecordBuilder {
    fn start_record(&mut self, id: &str) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::nested_record(id).with_context(self.context()));
        }
        self.current = Some(Record::new(id));
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        self.require_record("end-record")?;
        if !self.stack.is_empty() {
            return Err(Error::unclosed_entities(self.stack.len()).with_context(self.context()));
        }
        if let Some(record) = self.current.take() {
            self.finished.push_back(record);
        }
        Ok(())
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        self.require_record("start-entity")?;
        let value = if is_array_name(name) {
            Value::new_array()
        } else {
            Value::new_hash()
        };
        self.stack.push(Frame {
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        self.require_record("end-entity")?;
        let Some(frame) = self.stack.pop() else {
            return Err(Error::entity_underflow().with_context(self.context()));
        };
        self.attach(&frame.name, frame.value)
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        self.require_record("literal")?;
        self.attach(name, Value::from(value))
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.discard();
        Ok(())
    }

    fn close_stream(&mut self) -> Result<()> {
        self.discard();
        Ok(())
    }
}

// =============================================================================
// Record Emitter
// =============================================================================

/// Replays records as events.
///
/// Strings become literals and hashes become entities. An array under a
/// plain name is emitted as repeated fields; under a name ending in
/// [`ARRAY_MARKER`] it becomes one entity whose children are named `1`,
/// `2`, and so on.
pub struct RecordEmitter;

impl RecordEmitter {
    /// Emits a whole record, including `start_record` and `end_record`.
    ///
    /// # Errors
    ///
    /// Returns the first downstream error.
    pub fn emit<R: StreamReceiver + ?Sized>(record: &Record, receiver: &mut R) -> Result<()> {
        receiver.start_record(record.id())?;
        Self::emit_fields(record.fields(), receiver)?;
        receiver.end_record()
    }

    /// Emits the fields of a hash in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first downstream error.
    pub fn emit_fields<R: StreamReceiver + ?Sized>(
        fields: &FieldMap<Value>,
        receiver: &mut R,
    ) -> Result<()> {
        for (name, value) in fields.iter() {
            Self::emit_field(name, value, receiver)?;
        }
        Ok(())
    }

    /// Emits a single named value.
    ///
    /// # Errors
    ///
    /// Returns the first downstream error.
    pub fn emit_field<R: StreamReceiver + ?Sized>(
        name: &str,
        value: &Value,
        receiver: &mut R,
    ) -> Result<()> {
        match value {
            Value::String(text) => receiver.literal(name, text),
            Value::Hash(map) => {
                receiver.start_entity(name)?;
                Self::emit_fields(map, receiver)?;
                receiver.end_entity()
            }
            Value::Array(items) if is_array_name(name) => {
                receiver.start_entity(name)?;
                for (index, item) in items.iter().enumerate() {
                    Self::emit_field(&(index + 1).to_string(), item, receiver)?;
                }
                receiver.end_entity()
            }
            Value::Array(items) => {
                for item in items {
                    Self::emit_field(name, item, receiver)?;
                }
                Ok(())
            }
        }
    }
}
