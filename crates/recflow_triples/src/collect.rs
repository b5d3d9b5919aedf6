//! Grouping triples into records.

use std::sync::Arc;

use tracing::{debug, warn};

use recflow_foundation::{Error, Result};
use recflow_stream::StreamReceiver;

use crate::formeta::FormetaParser;
use crate::triple::{ObjectType, Triple};

/// Turns subject-contiguous triples into records.
///
/// Each run of triples sharing a subject becomes one record whose
/// identifier is that subject. String objects become literals named after
/// the predicate; entity objects are parsed as nested-structure text with
/// the predicate as default name.
///
/// Triples for one subject are expected to arrive together. A subject that
/// reappears after another one starts a second record.
#[derive(Debug)]
pub struct TripleCollect<R> {
    receiver: R,
    current_subject: Option<Arc<str>>,
    records: u64,
}

impl<R: StreamReceiver> TripleCollect<R> {
    /// Creates a collector in front of `receiver`.
    pub fn new(receiver: R) -> Self {
        Self {
            receiver,
            current_subject: None,
            records: 0,
        }
    }

    /// Returns the subject of the open record, if any.
    #[must_use]
    pub fn current_subject(&self) -> Option<&str> {
        self.current_subject.as_deref()
    }

    /// Returns the number of records opened so far.
    #[must_use]
    pub const fn records_started(&self) -> u64 {
        self.records
    }

    /// Processes one triple.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedObjectType` for objects that are neither strings
    /// nor entities, `ParseError` for malformed entity text, and any
    /// downstream error. The record stays open after an error.
    pub fn process(&mut self, triple: &Triple) -> Result<()> {
        match &self.current_subject {
            Some(subject) if **subject == *triple.subject => {}
            Some(_) => {
                self.end_record()?;
                self.start_record(&triple.subject)?;
            }
            None => self.start_record(&triple.subject)?,
        }
        self.decode(triple)
            .map_err(|e| e.in_record(&*triple.subject))
    }

    /// Processes every triple in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`process`](Self::process).
    pub fn process_all<'a, I>(&mut self, triples: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Triple>,
    {
        for triple in triples {
            self.process(triple)?;
        }
        Ok(())
    }

    fn decode(&mut self, triple: &Triple) -> Result<()> {
        match &triple.object_type {
            ObjectType::String => self.receiver.literal(&triple.predicate, &triple.object),
            ObjectType::Entity => {
                FormetaParser::parse(&triple.object, &triple.predicate, &mut self.receiver)
            }
            ObjectType::Other(tag) => Err(Error::unsupported_object_type(&**tag)),
        }
    }

    fn start_record(&mut self, subject: &Arc<str>) -> Result<()> {
        self.current_subject = Some(Arc::clone(subject));
        self.records += 1;
        debug!(subject = %subject, "opened triple record");
        self.receiver.start_record(subject)
    }

    fn end_record(&mut self) -> Result<()> {
        if let Some(subject) = self.current_subject.take() {
            debug!(subject = %subject, "closed triple record");
            self.receiver.end_record()?;
        }
        Ok(())
    }

    /// Closes the open record, if any, and discards in-flight state.
    ///
    /// # Errors
    ///
    /// Returns any downstream error.
    pub fn reset_stream(&mut self) -> Result<()> {
        if let Some(subject) = &self.current_subject {
            warn!(subject = %subject, "reset closes open triple record");
        }
        self.end_record()?;
        self.receiver.reset_stream()
    }

    /// Closes the open record, if any, and ends the stream.
    ///
    /// # Errors
    ///
    /// Returns any downstream error.
    pub fn close_stream(&mut self) -> Result<()> {
        self.end_record()?;
        self.receiver.close_stream()
    }

    /// Returns the downstream receiver.
    #[must_use]
    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    /// Returns the downstream receiver mutably.
    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    /// Consumes the collector and returns the downstream receiver.
    #[must_use]
    pub fn into_receiver(self) -> R {
        self.receiver
    }
}
