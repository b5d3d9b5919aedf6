//! Rules and the rule-bearing transformation stage.
//!
//! A [`Rule`] maps literal paths matching its source pattern to output
//! literals, optionally guarded by a [`Conditional`]. Rules are collected in
//! a [`RuleSet`], indexed by a [`WildcardTrie`], and applied by a
//! [`RuleStage`] once each record is complete.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use recflow_foundation::{Error, ErrorKind, LookupScratch, Record, Result, StreamLimit, WildcardTrie};
use recflow_stream::{RecordBuilder, RecordEmitter, StreamPipe, StreamReceiver};

use crate::config::EngineConfig;
use crate::path::SEPARATOR;
use crate::predicate::{Conditional, Options};

// =============================================================================
// Guard
// =============================================================================

/// A predicate with bound parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guard {
    /// The predicate.
    pub conditional: Conditional,
    /// Parameters, in order.
    pub params: Vec<String>,
    /// Named options.
    pub options: Options,
}

impl Guard {
    /// Builds a guard from a predicate name and parameters.
    ///
    /// The guard is checked once against an empty record, so malformed
    /// paths, bad regular expressions, and missing parameters are reported
    /// here rather than while records flow.
    ///
    /// # Errors
    ///
    /// Returns the configuration error the predicate raises.
    pub fn parse<I, S>(name: &str, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let guard = Self {
            conditional: Conditional::from_name(name)?,
            params: params.into_iter().map(Into::into).collect(),
            options: Options::new(),
        };
        guard.validate()?;
        Ok(guard)
    }

    /// Adds an option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    fn validate(&self) -> Result<()> {
        self.conditional
            .test(&Record::default(), &self.params, &self.options)
            .map(|_| ())
    }

    /// Evaluates the guard against a record.
    ///
    /// # Errors
    ///
    /// Returns any error the predicate raises.
    pub fn holds(&self, record: &Record, config: &EngineConfig) -> Result<bool> {
        self.conditional
            .evaluate(record, &self.params, &self.options, config)
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.conditional, self.params.join(", "))
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A source pattern mapped to an output literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Pattern over literal paths.
    pub source: Arc<str>,
    /// Output name; the matched path when absent.
    pub target: Option<Arc<str>>,
    /// Output value; the matched value when absent.
    pub constant: Option<Arc<str>>,
    /// Condition on the whole record.
    pub guard: Option<Guard>,
}

impl Rule {
    /// Creates a rule that copies matching literals unchanged.
    #[must_use]
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            target: None,
            constant: None,
            guard: None,
        }
    }

    /// Sets the output name.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets a constant output value.
    #[must_use]
    pub fn with_constant(mut self, constant: impl Into<Arc<str>>) -> Self {
        self.constant = Some(constant.into());
        self
    }

    /// Sets the guard.
    #[must_use]
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(target) = &self.target {
            write!(f, " -> {target}")?;
        }
        if let Some(constant) = &self.constant {
            write!(f, " = {constant:?}")?;
        }
        if let Some(guard) = &self.guard {
            write!(f, " if {guard}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// Identifier of a rule within its [`RuleSet`], in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    /// Returns the registration index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Rules indexed by source pattern.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: WildcardTrie<RuleId>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    pub fn add(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.rules.len());
        self.index.insert(&rule.source, id);
        trace!(rule = %rule, id = id.0, "registered rule");
        self.rules.push(rule);
        id
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.add(rule);
        self
    }

    /// Returns a rule by identifier.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates the rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns the rules whose source matches `path`, in registration order.
    #[must_use]
    pub fn rules_for(&self, path: &str) -> Vec<&Rule> {
        self.rules_for_with(path, &mut LookupScratch::new())
    }

    /// Like [`rules_for`](Self::rules_for), reusing caller-owned working sets.
    #[must_use]
    pub fn rules_for_with(&self, path: &str, scratch: &mut LookupScratch) -> Vec<&Rule> {
        let mut ids = self.index.lookup_with(path, scratch);
        ids.sort_unstable();
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = Self::new();
        for rule in iter {
            set.add(rule);
        }
        set
    }
}

// =============================================================================
// Literal Paths
// =============================================================================

/// Receiver that records every literal together with its full path.
#[derive(Default)]
struct PathCollector {
    stack: Vec<String>,
    literals: Vec<(String, Arc<str>)>,
}

impl PathCollector {
    fn path(&self, name: &str) -> String {
        let mut path = String::new();
        for entity in &self.stack {
            path.push_str(entity);
            path.push(SEPARATOR);
        }
        path.push_str(name);
        path
    }
}

impl StreamReceiver for PathCollector {
    fn start_record(&mut self, _id: &str) -> Result<()> {
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        self.stack.push(name.to_owned());
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        self.stack.pop();
        Ok(())
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        self.literals.push((self.path(name), value.into()));
        Ok(())
    }
}

/// Lists the literal paths of a record with their values, in emission
/// order. Entity names are joined with `.`; arrays appear as the record
/// emitter would replay them.
///
/// # Errors
///
/// Never fails in practice; the signature follows the receiver contract.
pub fn literal_paths(record: &Record) -> Result<Vec<(String, Arc<str>)>> {
    let mut collector = PathCollector::default();
    RecordEmitter::emit_fields(record.fields(), &mut collector)?;
    Ok(collector.literals)
}

// =============================================================================
// Rule Stage
// =============================================================================

/// Applies a [`RuleSet`] to each complete record.
///
/// Incoming events are materialized with a [`RecordBuilder`]. At
/// `end_record` every literal path is looked up in the rule set and each
/// matching rule whose guard holds emits one literal downstream. Nothing is
/// sent before the record is complete, so a reset or close only drops the
/// partial record and propagates.
#[derive(Debug)]
pub struct RuleStage<R> {
    rules: RuleSet,
    config: EngineConfig,
    builder: RecordBuilder,
    scratch: LookupScratch,
    receiver: R,
    records_emitted: u64,
    records_skipped: u64,
}

impl<R: StreamReceiver> RuleStage<R> {
    /// Creates a stage with the default configuration.
    pub fn new(rules: RuleSet, receiver: R) -> Self {
        Self::with_config(rules, EngineConfig::default(), receiver)
    }

    /// Creates a stage with an explicit configuration.
    pub fn with_config(rules: RuleSet, config: EngineConfig, receiver: R) -> Self {
        Self {
            rules,
            config,
            builder: RecordBuilder::new(),
            scratch: LookupScratch::new(),
            receiver,
            records_emitted: 0,
            records_skipped: 0,
        }
    }

    /// Returns the rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the number of records sent downstream.
    #[must_use]
    pub const fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    /// Returns the number of records that produced no output and were
    /// withheld.
    #[must_use]
    pub const fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    fn apply(&mut self, record: &Record) -> Result<Vec<(Arc<str>, Arc<str>)>> {
        let mut output = Vec::new();
        for (path, value) in literal_paths(record)? {
            for rule in self.rules.rules_for_with(&path, &mut self.scratch) {
                if let Some(guard) = &rule.guard {
                    if !guard.holds(record, &self.config)? {
                        continue;
                    }
                }
                let name = rule.target.clone().unwrap_or_else(|| path.as_str().into());
                let value = rule.constant.clone().unwrap_or_else(|| value.clone());
                trace!(record = record.id(), rule = %rule, path = %path, "rule fired");
                output.push((name, value));
            }
        }
        Ok(output)
    }

    fn process(&mut self, record: &Record) -> Result<()> {
        let output = self
            .apply(record)
            .map_err(|e| e.in_record(record.id()))?;

        if output.is_empty() && !self.config.emit_empty_records {
            self.records_skipped += 1;
            debug!(record = record.id(), "rule stage skipped empty record");
            return Ok(());
        }

        self.receiver.start_record(record.id())?;
        for (name, value) in &output {
            self.receiver.literal(name, value)?;
        }
        self.receiver.end_record()?;
        self.records_emitted += 1;
        debug!(record = record.id(), literals = output.len(), "rule stage emitted record");
        Ok(())
    }
}

impl<R: StreamReceiver> StreamReceiver for RuleStage<R> {
    fn start_record(&mut self, id: &str) -> Result<()> {
        self.builder.start_record(id)
    }

    fn end_record(&mut self) -> Result<()> {
        self.builder.end_record()?;
        while let Some(record) = self.builder.take_record() {
            self.process(&record)?;
        }
        Ok(())
    }

    fn start_entity(&mut self, name: &str) -> Result<()> {
        let limit = self.config.max_entity_depth;
        if self.builder.depth() >= limit {
            let error = Error::new(ErrorKind::LimitExceeded(StreamLimit::MaxEntityDepth {
                limit,
                entity: Some(name.to_owned()),
            }));
            return Err(match self.builder.current() {
                Some(record) => error.in_record(record.id()),
                None => error,
            });
        }
        self.builder.start_entity(name)
    }

    fn end_entity(&mut self) -> Result<()> {
        self.builder.end_entity()
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        self.builder.literal(name, value)
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.builder.reset_stream()?;
        self.receiver.reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        self.builder.close_stream()?;
        self.receiver.close_stream()
    }
}

impl<R: StreamReceiver> StreamPipe for RuleStage<R> {
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
