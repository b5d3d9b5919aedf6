//! Error types for the recflow system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Errors fall into two groups: configuration errors, raised while a stage
//! or rule set is being built, and contract violations, raised while events
//! flow. A path that resolves to nothing is never an error.

use std::fmt;

use thiserror::Error;

/// The main error type for recflow operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches the identifier of the record being processed.
    ///
    /// Keeps any context already present.
    #[must_use]
    pub fn in_record(mut self, id: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_record(id));
        self
    }

    /// Creates an unknown predicate error.
    #[must_use]
    pub fn unknown_predicate(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownPredicate(name.into()))
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            name: name.into(),
            expected,
            actual,
        })
    }

    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid regular expression error.
    #[must_use]
    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Creates a parse error at a byte offset.
    #[must_use]
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            offset,
        })
    }

    /// Creates an error for an event that arrived outside any record.
    #[must_use]
    pub fn outside_record(event: impl Into<String>) -> Self {
        Self::new(ErrorKind::EventOutsideRecord(event.into()))
    }

    /// Creates an error for a record opened inside another record.
    #[must_use]
    pub fn nested_record(id: impl Into<String>) -> Self {
        Self::new(ErrorKind::NestedRecord(id.into()))
    }

    /// Creates an error for an `end-entity` without an open entity.
    #[must_use]
    pub fn entity_underflow() -> Self {
        Self::new(ErrorKind::EntityUnderflow)
    }

    /// Creates an error for a record closed while entities are still open.
    #[must_use]
    pub fn unclosed_entities(depth: usize) -> Self {
        Self::new(ErrorKind::UnclosedEntities(depth))
    }

    /// Creates an unsupported triple object type error.
    #[must_use]
    pub fn unsupported_object_type(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedObjectType(tag.into()))
    }

    /// Creates a stream limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: StreamLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error was raised while building a stage
    /// rather than while processing events.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnknownPredicate(_)
                | ErrorKind::ArityMismatch { .. }
                | ErrorKind::InvalidPath { .. }
                | ErrorKind::InvalidRegex { .. }
                | ErrorKind::ParseError { .. }
        )
    }
}

/// Categorized error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No predicate with the given name exists.
    #[error("unknown predicate: {0}")]
    UnknownPredicate(String),

    /// A predicate received fewer parameters than it requires.
    #[error("arity mismatch for {name}: expected at least {expected}, got {actual}")]
    ArityMismatch {
        /// The predicate name.
        name: String,
        /// Minimum number of parameters.
        expected: usize,
        /// Actual number of parameters.
        actual: usize,
    },

    /// A path expression could not be parsed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The path text.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A regular expression operand did not compile.
    #[error("invalid regex {pattern:?}: {message}")]
    InvalidRegex {
        /// The pattern text.
        pattern: String,
        /// The compiler's message.
        message: String,
    },

    /// Nested-structure text could not be parsed.
    #[error("parse error at offset {offset}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Byte offset into the input.
        offset: usize,
    },

    /// An entity or literal event arrived while no record was open.
    #[error("{0} received outside of a record")]
    EventOutsideRecord(String),

    /// A record was started while another was still open.
    #[error("record {0:?} started inside an open record")]
    NestedRecord(String),

    /// `end-entity` arrived with no entity open.
    #[error("end-entity without a matching start-entity")]
    EntityUnderflow,

    /// `end-record` arrived with entities still open.
    #[error("end-record with {0} unclosed entities")]
    UnclosedEntities(usize),

    /// A triple carried an object type that cannot be decoded.
    #[error("{0} can not yet be decoded")]
    UnsupportedObjectType(String),

    /// A stream limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(StreamLimit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stream limits that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLimit {
    /// Maximum entity nesting depth exceeded.
    MaxEntityDepth {
        /// The configured limit.
        limit: usize,
        /// The entity whose start crossed the limit.
        entity: Option<String>,
    },
}

impl fmt::Display for StreamLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxEntityDepth { limit, entity } => {
                write!(f, "max entity depth ({limit}) exceeded")?;
                if let Some(name) = entity {
                    write!(f, " at entity {name}")?;
                }
                Ok(())
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Identifier of the record being processed.
    pub record: Option<String>,
    /// Stage or rule that raised the error.
    pub source: Option<String>,
    /// Stack of enclosing entity names, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record identifier.
    #[must_use]
    pub fn with_record(mut self, id: impl Into<String>) -> Self {
        self.record = Some(id.into());
        self
    }

    /// Sets the source stage or rule.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds an entity frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if let Some(record) = &self.record {
            if self.source.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at record {record}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for recflow operations.
pub type Result<T> = std::result::Result<T, Error>;
