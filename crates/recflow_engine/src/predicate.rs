//! Conditional predicates over records.
//!
//! Every predicate is a variant of [`Conditional`] and is evaluated by one
//! exhaustive `match`. Evaluation is pure: it reads the record and never
//! changes it. Parameters are strings; depending on the predicate they are
//! paths into the record or literal operands.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use recflow_foundation::{Error, Record, Result, Value};

use crate::config::EngineConfig;
use crate::path::Path;

/// Named options passed alongside predicate parameters.
pub type Options = BTreeMap<String, String>;

/// Option that switches boolean parsing to the strict forms only.
pub const STRICT_OPTION: &str = "strict";

// =============================================================================
// Conditional
// =============================================================================

/// A named boolean test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conditional {
    /// Parameter 0 contains parameter 1.
    StrContain,
    /// Parameter 0 equals parameter 1.
    StrEqual,
    /// Parameter 0 fully matches the regex in parameter 1.
    StrMatch,
    /// Every leaf at the path contains the operand.
    AllContain,
    /// Some leaf at the path contains the operand.
    AnyContain,
    /// No leaf at the path contains the operand.
    NoneContain,
    /// Every leaf at the path equals the operand.
    AllEqual,
    /// Some leaf at the path equals the operand.
    AnyEqual,
    /// No leaf at the path equals the operand.
    NoneEqual,
    /// Every leaf at the path fully matches the regex.
    AllMatch,
    /// Some leaf at the path fully matches the regex.
    AnyMatch,
    /// No leaf at the path fully matches the regex.
    NoneMatch,
    /// Every leaf at the path is numerically greater than the operand.
    GreaterThan,
    /// Every leaf at the path is numerically less than the operand.
    LessThan,
    /// Every value at the path is an array.
    IsArray,
    /// Every value at the path is a hash. Also named `is_object`.
    IsHash,
    /// Every value at the path is a non-numeric string.
    IsString,
    /// Every value at the path is a numeric string.
    IsNumber,
    /// Every value at the path is a true boolean string.
    IsTrue,
    /// Every value at the path is a false boolean string.
    IsFalse,
    /// Every value at the path is empty.
    IsEmpty,
    /// The path resolves to something.
    Exists,
    /// The value at the first path is contained in the value at the second.
    /// Also named `is_contained_in`.
    In,
}

#[derive(Clone, Copy)]
enum Quantifier {
    All,
    Any,
    None,
}

#[derive(Clone, Copy)]
enum Comparison {
    Contain,
    Equal,
    Match,
    GreaterThan,
    LessThan,
}

#[derive(Clone, Copy)]
enum Shape {
    Array,
    Hash,
    Number,
    True,
    False,
    Empty,
}

impl Conditional {
    /// Every predicate, in declaration order.
    pub const ALL: [Conditional; 23] = [
        Self::StrContain,
        Self::StrEqual,
        Self::StrMatch,
        Self::AllContain,
        Self::AnyContain,
        Self::NoneContain,
        Self::AllEqual,
        Self::AnyEqual,
        Self::NoneEqual,
        Self::AllMatch,
        Self::AnyMatch,
        Self::NoneMatch,
        Self::GreaterThan,
        Self::LessThan,
        Self::IsArray,
        Self::IsHash,
        Self::IsString,
        Self::IsNumber,
        Self::IsTrue,
        Self::IsFalse,
        Self::IsEmpty,
        Self::Exists,
        Self::In,
    ];

    /// Looks a predicate up by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPredicate` if no predicate has this name.
    pub fn from_name(name: &str) -> Result<Self> {
        let conditional = match name {
            "str_contain" => Self::StrContain,
            "str_equal" => Self::StrEqual,
            "str_match" => Self::StrMatch,
            "all_contain" => Self::AllContain,
            "any_contain" => Self::AnyContain,
            "none_contain" => Self::NoneContain,
            "all_equal" => Self::AllEqual,
            "any_equal" => Self::AnyEqual,
            "none_equal" => Self::NoneEqual,
            "all_match" => Self::AllMatch,
            "any_match" => Self::AnyMatch,
            "none_match" => Self::NoneMatch,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "is_array" => Self::IsArray,
            "is_hash" | "is_object" => Self::IsHash,
            "is_string" => Self::IsString,
            "is_number" => Self::IsNumber,
            "is_true" => Self::IsTrue,
            "is_false" => Self::IsFalse,
            "is_empty" => Self::IsEmpty,
            "exists" => Self::Exists,
            "in" | "is_contained_in" => Self::In,
            _ => return Err(Error::unknown_predicate(name)),
        };
        Ok(conditional)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StrContain => "str_contain",
            Self::StrEqual => "str_equal",
            Self::StrMatch => "str_match",
            Self::AllContain => "all_contain",
            Self::AnyContain => "any_contain",
            Self::NoneContain => "none_contain",
            Self::AllEqual => "all_equal",
            Self::AnyEqual => "any_equal",
            Self::NoneEqual => "none_equal",
            Self::AllMatch => "all_match",
            Self::AnyMatch => "any_match",
            Self::NoneMatch => "none_match",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::IsArray => "is_array",
            Self::IsHash => "is_hash",
            Self::IsString => "is_string",
            Self::IsNumber => "is_number",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
            Self::IsEmpty => "is_empty",
            Self::Exists => "exists",
            Self::In => "in",
        }
    }

    /// Returns the number of parameters the predicate requires.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::IsArray
            | Self::IsHash
            | Self::IsString
            | Self::IsNumber
            | Self::IsTrue
            | Self::IsFalse
            | Self::IsEmpty
            | Self::Exists => 1,
            _ => 2,
        }
    }

    /// Evaluates the predicate with the default engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` for missing parameters, `InvalidPath` for a
    /// malformed path parameter, and `InvalidRegex` for a bad pattern.
    pub fn test<S: AsRef<str>>(self, record: &Record, params: &[S], options: &Options) -> Result<bool> {
        self.evaluate(record, params, options, &EngineConfig::default())
    }

    /// Evaluates the predicate, taking defaults from `config`.
    ///
    /// # Errors
    ///
    /// See [`test`](Self::test).
    pub fn evaluate<S: AsRef<str>>(
        self,
        record: &Record,
        params: &[S],
        options: &Options,
        config: &EngineConfig,
    ) -> Result<bool> {
        if params.len() < self.arity() {
            return Err(Error::arity_mismatch(self.name(), self.arity(), params.len()));
        }
        let first = params[0].as_ref();
        let second = params.get(1).map_or("", AsRef::as_ref);
        let strict = strict_booleans(options, config.strict_booleans);

        match self {
            Self::StrContain => compare_literal(first, second, Comparison::Contain),
            Self::StrEqual => compare_literal(first, second, Comparison::Equal),
            Self::StrMatch => compare_literal(first, second, Comparison::Match),
            Self::AllContain => quantified(record, first, second, Quantifier::All, Comparison::Contain),
            Self::AnyContain => quantified(record, first, second, Quantifier::Any, Comparison::Contain),
            Self::NoneContain => quantified(record, first, second, Quantifier::None, Comparison::Contain),
            Self::AllEqual => quantified(record, first, second, Quantifier::All, Comparison::Equal),
            Self::AnyEqual => quantified(record, first, second, Quantifier::Any, Comparison::Equal),
            Self::NoneEqual => quantified(record, first, second, Quantifier::None, Comparison::Equal),
            Self::AllMatch => quantified(record, first, second, Quantifier::All, Comparison::Match),
            Self::AnyMatch => quantified(record, first, second, Quantifier::Any, Comparison::Match),
            Self::NoneMatch => quantified(record, first, second, Quantifier::None, Comparison::Match),
            Self::GreaterThan => quantified(record, first, second, Quantifier::All, Comparison::GreaterThan),
            Self::LessThan => quantified(record, first, second, Quantifier::All, Comparison::LessThan),
            Self::IsArray => shaped(record, first, Shape::Array, strict),
            Self::IsHash => shaped(record, first, Shape::Hash, strict),
            Self::IsNumber => shaped(record, first, Shape::Number, strict),
            Self::IsTrue => shaped(record, first, Shape::True, strict),
            Self::IsFalse => shaped(record, first, Shape::False, strict),
            Self::IsEmpty => shaped(record, first, Shape::Empty, strict),
            Self::IsString => {
                let values = Path::parse(first)?.resolve_refs(record);
                Ok(!values.is_empty()
                    && values.iter().all(|v| v.is_string())
                    && !values.iter().all(|v| Shape::Number.check(v, strict)))
            }
            Self::Exists => Ok(Path::parse(first)?.exists(record)),
            Self::In => membership(record, first, second),
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Conditional {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

// =============================================================================
// Comparisons
// =============================================================================

enum Matcher<'a> {
    Contain(&'a str),
    Equal(&'a str),
    Match(Regex),
    GreaterThan(Option<f64>),
    LessThan(Option<f64>),
}

impl<'a> Matcher<'a> {
    fn new(comparison: Comparison, operand: &'a str) -> Result<Self> {
        Ok(match comparison {
            Comparison::Contain => Self::Contain(operand),
            Comparison::Equal => Self::Equal(operand),
            Comparison::Match => Self::Match(full_match_regex(operand)?),
            Comparison::GreaterThan => Self::GreaterThan(parse_number(operand)),
            Comparison::LessThan => Self::LessThan(parse_number(operand)),
        })
    }

    fn check(&self, leaf: &str) -> bool {
        match self {
            Self::Contain(operand) => leaf.contains(*operand),
            Self::Equal(operand) => leaf == *operand,
            Self::Match(regex) => regex.is_match(leaf),
            Self::GreaterThan(bound) => {
                matches!((parse_number(leaf), bound), (Some(x), Some(b)) if x > *b)
            }
            Self::LessThan(bound) => {
                matches!((parse_number(leaf), bound), (Some(x), Some(b)) if x < *b)
            }
        }
    }
}

/// Compiles `pattern` so that it must match a whole string.
///
/// # Errors
///
/// Returns `InvalidRegex` if the pattern does not compile.
pub fn full_match_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{pattern})\z"))
        .map_err(|e| Error::invalid_regex(pattern, e.to_string()))
}

fn compare_literal(subject: &str, operand: &str, comparison: Comparison) -> Result<bool> {
    Ok(Matcher::new(comparison, operand)?.check(subject))
}

fn quantified(
    record: &Record,
    path: &str,
    operand: &str,
    quantifier: Quantifier,
    comparison: Comparison,
) -> Result<bool> {
    let path = Path::parse(path)?;
    let matcher = Matcher::new(comparison, operand)?;
    let mut leaves = Vec::new();
    for value in path.resolve_refs(record) {
        collect_leaves(value, &mut leaves);
    }
    let hit = |leaf: &Option<&str>| leaf.is_some_and(|text| matcher.check(text));
    Ok(match quantifier {
        Quantifier::All => leaves.iter().all(hit),
        Quantifier::Any => leaves.iter().any(hit),
        Quantifier::None => !leaves.iter().any(hit),
    })
}

/// Gathers the comparable leaves of a resolved value, descending into
/// arrays. A hash is not comparable and yields `None`, which fails every
/// comparison.
fn collect_leaves<'a>(value: &'a Value, out: &mut Vec<Option<&'a str>>) {
    match value {
        Value::String(text) => out.push(Some(&**text)),
        Value::Array(items) => {
            for item in items {
                collect_leaves(item, out);
            }
        }
        Value::Hash(_) => out.push(None),
    }
}

// =============================================================================
// Shapes
// =============================================================================

impl Shape {
    fn check(self, value: &Value, strict: bool) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::Hash => value.is_hash(),
            Self::Number => value.as_str().is_some_and(is_number),
            Self::True => value.as_str().and_then(|s| parse_bool(s, strict)) == Some(true),
            Self::False => value.as_str().and_then(|s| parse_bool(s, strict)) == Some(false),
            Self::Empty => value.is_empty(),
        }
    }
}

fn shaped(record: &Record, path: &str, shape: Shape, strict: bool) -> Result<bool> {
    let values = Path::parse(path)?.resolve_refs(record);
    Ok(!values.is_empty() && values.iter().all(|v| shape.check(v, strict)))
}

/// Returns true for decimal numbers such as `42`, `-1.5`, `.5`, or `1e3`.
#[must_use]
pub fn is_number(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    body.bytes().any(|b| b.is_ascii_digit())
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && text.parse::<f64>().is_ok()
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if is_number(text) { text.parse().ok() } else { None }
}

/// Parses a boolean string.
///
/// Strict parsing accepts only `true` and `false`. Lenient parsing also
/// accepts `1`, `0`, and any letter case.
#[must_use]
pub fn parse_bool(text: &str, strict: bool) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ if strict => None,
        "1" => Some(true),
        "0" => Some(false),
        _ if text.eq_ignore_ascii_case("true") => Some(true),
        _ if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn strict_booleans(options: &Options, default: bool) -> bool {
    options
        .get(STRICT_OPTION)
        .and_then(|v| parse_bool(v, false))
        .unwrap_or(default)
}

// =============================================================================
// Membership
// =============================================================================

fn membership(record: &Record, needle: &str, haystack: &str) -> Result<bool> {
    let needle = Path::parse(needle)?;
    let haystack = Path::parse(haystack)?;
    let first = needle.resolve_refs(record).first().copied();
    let second = haystack.resolve_refs(record).first().copied();
    Ok(match (first, second) {
        (Some(x), Some(y)) => contained_in(x, y),
        _ => false,
    })
}

/// Membership of one value in another.
///
/// A string is in an array when an element equals it, in a hash when it is
/// a key, and in a string when equal. Arrays and hashes are in values of
/// their own variant when structurally equal.
#[must_use]
pub fn contained_in(needle: &Value, haystack: &Value) -> bool {
    match (needle, haystack) {
        (Value::String(_), Value::Array(items)) => items.iter().any(|item| item == needle),
        (Value::String(key), Value::Hash(map)) => map.contains_key(key),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(_), Value::Array(_)) | (Value::Hash(_), Value::Hash(_)) => needle == haystack,
        _ => false,
    }
}
