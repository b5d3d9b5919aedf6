//! Integration tests for Value types
//!
//! Tests variant construction, structural equality, hashing, and display.

use recflow_foundation::{FieldMap, List, Record, Value, ValueKind};
use std::collections::HashSet;

fn hash_of(pairs: &[(&str, &str)]) -> Value {
    pairs
        .iter()
        .map(|(k, v)| (*k, Value::from(*v)))
        .collect::<FieldMap<Value>>()
        .into()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn value_kinds() {
    assert_eq!(Value::from("x").kind(), ValueKind::String);
    assert_eq!(Value::new_array().kind(), ValueKind::Array);
    assert_eq!(Value::new_hash().kind(), ValueKind::Hash);
}

#[test]
fn empty_values() {
    assert!(Value::from("").is_empty());
    assert!(Value::new_array().is_empty());
    assert!(Value::new_hash().is_empty());
    assert!(!Value::from("x").is_empty());
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn differing_variants_are_unequal() {
    let s = Value::from("a");
    let a = Value::from(vec!["a"]);
    let h = hash_of(&[("a", "a")]);
    assert_ne!(s, a);
    assert_ne!(a, h);
    assert_ne!(s, h);
}

#[test]
fn hash_key_order_is_irrelevant() {
    let a = hash_of(&[("x", "1"), ("y", "2")]);
    let b = hash_of(&[("y", "2"), ("x", "1")]);
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn array_order_matters() {
    assert_ne!(Value::from(vec!["a", "b"]), Value::from(vec!["b", "a"]));
}

#[test]
fn nested_equality() {
    let inner = hash_of(&[("k", "v")]);
    let a: Value = vec![inner.clone(), Value::from("z")].into();
    let b: Value = vec![inner, Value::from("z")].into();
    assert_eq!(a, b);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn match_type_dispatches_by_variant() {
    let describe = |v: &Value| {
        v.match_type(
            |s| format!("string {s}"),
            |a| format!("array of {}", a.len()),
            |h| format!("hash of {}", h.len()),
        )
    };
    assert_eq!(describe(&Value::from("x")), "string x");
    assert_eq!(describe(&Value::from(vec!["a", "b"])), "array of 2");
    assert_eq!(describe(&hash_of(&[("a", "1")])), "hash of 1");
}

#[test]
fn extract_type_with_fallback() {
    let v = Value::from(vec!["a"]);
    let result = v
        .extract_type()
        .if_string(|_| "string")
        .if_hash(|_| "hash")
        .or_else(|_| "other");
    assert_eq!(result, "other");
}

#[test]
fn flatten_strings_walks_arrays() {
    let v: Value = vec![Value::from("a"), Value::from(vec!["b", "c"]), hash_of(&[("k", "v")])].into();
    assert_eq!(v.flatten_strings(), vec!["a", "b", "c"]);
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn record_repeated_fields() {
    let mut record = Record::new("r1");
    record.add_field("subject", "a");
    record.add_field("subject", "b");
    record.add_field("title", "t");
    let subject: List<Value> = ["a", "b"].into_iter().map(Value::from).collect();
    assert_eq!(record.get("subject"), Some(&Value::Array(subject)));
    assert_eq!(record.to_value().to_string(), "{subject: [a, b], title: t}");
}
