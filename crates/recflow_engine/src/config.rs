//! Configuration for rule stages and predicate evaluation.

use recflow_stream::StreamLimits;

/// Configuration for the transformation engine.
///
/// Controls record emission, boolean parsing, and nesting limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Emit `start_record`/`end_record` for records that produced no output.
    pub emit_empty_records: bool,

    /// Accept only `true`/`false` as booleans, unless a predicate's own
    /// `strict` option says otherwise.
    pub strict_booleans: bool,

    /// Maximum number of simultaneously open entities per record.
    pub max_entity_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emit_empty_records: true,
            strict_booleans: false,
            max_entity_depth: 64,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration that skips empty output and parses booleans
    /// strictly.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            emit_empty_records: false,
            strict_booleans: true,
            max_entity_depth: 32,
        }
    }

    /// Creates a permissive configuration with no practical depth limit.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            emit_empty_records: true,
            strict_booleans: false,
            max_entity_depth: usize::MAX,
        }
    }

    /// Builder method to set empty-record emission.
    #[must_use]
    pub fn with_emit_empty_records(mut self, emit: bool) -> Self {
        self.emit_empty_records = emit;
        self
    }

    /// Builder method to set strict boolean parsing.
    #[must_use]
    pub fn with_strict_booleans(mut self, strict: bool) -> Self {
        self.strict_booleans = strict;
        self
    }

    /// Builder method to set the maximum entity depth.
    #[must_use]
    pub fn with_max_entity_depth(mut self, depth: usize) -> Self {
        self.max_entity_depth = depth;
        self
    }

    /// Returns the stream limits derived from this configuration.
    #[must_use]
    pub fn stream_limits(&self) -> StreamLimits {
        StreamLimits::default().with_max_entity_depth(self.max_entity_depth)
    }
}
