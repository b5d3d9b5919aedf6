//! Path parsing and resolution.
//!
//! A path is a `.`-separated list of segments. Each segment is a literal
//! field name, a 1-based array index, `$first`, `$last`, or a wildcard
//! pattern using `*`, `?`, and `|`.
//!
//! Resolution never fails: a segment that does not apply to the value it
//! meets simply contributes nothing.

use std::fmt;
use std::sync::Arc;

use recflow_foundation::{Error, FieldMap, Record, Result, Value, WildcardTrie, has_wildcard};

/// Separates path segments.
pub const SEPARATOR: char = '.';

/// Selects the first element of an array.
pub const FIRST: &str = "$first";

/// Selects the last element of an array.
pub const LAST: &str = "$last";

// =============================================================================
// Segment
// =============================================================================

/// One step of a path.
#[derive(Clone, Debug)]
pub enum Segment {
    /// Exact field name.
    Literal(Arc<str>),
    /// All-digit segment: a 1-based position in arrays, a key in hashes.
    Index {
        /// 1-based array position.
        position: usize,
        /// Original text, used as a hash key.
        key: Arc<str>,
    },
    /// First array element.
    First,
    /// Last array element.
    Last,
    /// Wildcard pattern over hash keys; expands to all array elements.
    Wildcard {
        /// Pattern text.
        pattern: Arc<str>,
        /// Compiled pattern.
        trie: WildcardTrie<()>,
    },
}

impl Segment {
    /// Classifies one segment of path text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == FIRST {
            return Self::First;
        }
        if text == LAST {
            return Self::Last;
        }
        if has_wildcard(text) {
            return Self::Wildcard {
                pattern: text.into(),
                trie: WildcardTrie::single(text),
            };
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(position) = text.parse() {
                return Self::Index {
                    position,
                    key: text.into(),
                };
            }
        }
        Self::Literal(text.into())
    }

    /// Returns the segment text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(key) | Self::Index { key, .. } => key,
            Self::First => FIRST,
            Self::Last => LAST,
            Self::Wildcard { pattern, .. } => pattern,
        }
    }

    fn resolve_hash<'a>(&self, map: &'a FieldMap<Value>, rest: &[Segment], out: &mut Vec<&'a Value>) {
        match self {
            Self::Wildcard { trie, .. } => {
                for (key, value) in map.iter() {
                    if trie.matches(key) {
                        walk(value, rest, out);
                    }
                }
            }
            other => {
                if let Some(value) = map.get(other.as_str()) {
                    walk(value, rest, out);
                }
            }
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Segment {}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Path
// =============================================================================

/// A parsed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    text: Arc<str>,
    segments: Vec<Segment>,
}

impl Path {
    /// Parses path text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the text or any segment is empty.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::invalid_path(text, "path is empty"));
        }
        let segments = text
            .split(SEPARATOR)
            .enumerate()
            .map(|(i, segment)| {
                if segment.is_empty() {
                    Err(Error::invalid_path(text, format!("segment {} is empty", i + 1)))
                } else {
                    Ok(Segment::parse(segment))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            text: text.into(),
            segments,
        })
    }

    /// Returns the original text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if any segment is a wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Wildcard { .. }))
    }

    /// Resolves the path against a record, borrowing the matches.
    #[must_use]
    pub fn resolve_refs<'a>(&self, record: &'a Record) -> Vec<&'a Value> {
        self.resolve_in(record.fields())
    }

    /// Resolves the path against the fields of a hash.
    #[must_use]
    pub fn resolve_in<'a>(&self, fields: &'a FieldMap<Value>) -> Vec<&'a Value> {
        let mut out = Vec::new();
        if let Some((head, rest)) = self.segments.split_first() {
            head.resolve_hash(fields, rest, &mut out);
        }
        out
    }

    /// Resolves the path against a record.
    #[must_use]
    pub fn resolve(&self, record: &Record) -> Vec<Value> {
        self.resolve_refs(record).into_iter().cloned().collect()
    }

    /// Returns true if the path resolves to at least one value.
    #[must_use]
    pub fn exists(&self, record: &Record) -> bool {
        !self.resolve_refs(record).is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn walk<'a>(value: &'a Value, segments: &[Segment], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(value);
        return;
    };
    match value {
        Value::Hash(map) => head.resolve_hash(map, rest, out),
        Value::Array(items) => {
            let selected = match head {
                Segment::Index { position, .. } => {
                    position.checked_sub(1).and_then(|i| items.get(i))
                }
                Segment::First => items.first(),
                Segment::Last => items.last(),
                Segment::Wildcard { .. } => {
                    for item in items {
                        walk(item, rest, out);
                    }
                    None
                }
                Segment::Literal(_) => None,
            };
            if let Some(item) = selected {
                walk(item, rest, out);
            }
        }
        Value::String(_) => {}
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Resolves `path` against `record`.
#[must_use]
pub fn resolve(record: &Record, path: &Path) -> Vec<Value> {
    path.resolve(record)
}

/// Parses `text` and resolves it against `record`.
///
/// # Errors
///
/// Returns `InvalidPath` if the text is not a valid path.
pub fn resolve_str(record: &Record, text: &str) -> Result<Vec<Value>> {
    Ok(Path::parse(text)?.resolve(record))
}

/// Returns true if `path` resolves to anything in `record`.
#[must_use]
pub fn exists(record: &Record, path: &Path) -> bool {
    path.exists(record)
}
