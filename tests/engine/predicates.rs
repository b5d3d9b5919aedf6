//! Integration tests for predicates

use recflow_engine::{Conditional, EngineConfig, Options};
use recflow_foundation::ErrorKind;

use crate::sample_record;

fn check(name: &str, params: &[&str]) -> bool {
    Conditional::from_name(name)
        .unwrap()
        .test(&sample_record(), params, &Options::new())
        .unwrap()
}

// =============================================================================
// Literal Comparisons
// =============================================================================

#[test]
fn literal_string_predicates() {
    assert!(check("str_contain", &["Faust I", "Faust"]));
    assert!(check("str_equal", &["x", "x"]));
    assert!(check("str_match", &["2024-01", r"\d{4}-\d{2}"]));
    assert!(!check("str_match", &["2024-01x", r"\d{4}-\d{2}"]));
}

// =============================================================================
// Quantified Comparisons
// =============================================================================

#[test]
fn quantifiers_over_array() {
    assert!(check("any_equal", &["subject", "poetry"]));
    assert!(!check("all_equal", &["subject", "poetry"]));
    assert!(check("none_equal", &["subject", "novel"]));
    assert!(check("all_match", &["subject", "[a-z]+"]));
    assert!(check("any_contain", &["subject", "trag"]));
    assert!(check("none_contain", &["subject", "comedy"]));
}

#[test]
fn quantifiers_on_missing_path() {
    assert!(check("all_equal", &["missing", "x"]));
    assert!(!check("any_equal", &["missing", "x"]));
    assert!(check("none_equal", &["missing", "x"]));
}

#[test]
fn quantifiers_over_hash() {
    assert!(!check("all_equal", &["author", "nonsense"]));
    assert!(!check("greater_than", &["author", "5"]));
    assert!(!check("any_contain", &["author", "Goethe"]));
    assert!(check("none_contain", &["author", "Goethe"]));
    assert!(check("all_equal", &["author.name", "Goethe"]));
}

#[test]
fn numeric_comparisons() {
    assert!(check("greater_than", &["pages", "100"]));
    assert!(!check("greater_than", &["pages", "1000"]));
    assert!(check("less_than", &["author.born", "1800"]));
    assert!(!check("less_than", &["title", "5"]));
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn shape_predicates() {
    assert!(check("is_array", &["subject"]));
    assert!(check("is_hash", &["author"]));
    assert!(check("is_object", &["author"]));
    assert!(check("is_string", &["title"]));
    assert!(!check("is_string", &["pages"]));
    assert!(check("is_number", &["pages"]));
    assert!(check("is_true", &["available"]));
    assert!(!check("is_false", &["available"]));
    assert!(check("is_empty", &["note"]));
    assert!(!check("is_array", &["missing"]));
}

#[test]
fn existence_and_membership() {
    assert!(check("exists", &["author.name"]));
    assert!(!check("exists", &["author.death"]));
    assert!(check("in", &["subject.$first", "subject"]));
    assert!(check("is_contained_in", &["subject.2", "subject"]));
    assert!(!check("in", &["title", "subject"]));
}

#[test]
fn boolean_strictness_from_config_and_options() {
    let mut record = sample_record();
    record.insert("flag", "TRUE");
    let lenient = EngineConfig::default();
    let strict = EngineConfig::strict();

    assert!(Conditional::IsTrue
        .evaluate(&record, &["flag"], &Options::new(), &lenient)
        .unwrap());
    assert!(!Conditional::IsTrue
        .evaluate(&record, &["flag"], &Options::new(), &strict)
        .unwrap());

    let mut options = Options::new();
    options.insert("strict".to_owned(), "false".to_owned());
    assert!(Conditional::IsTrue
        .evaluate(&record, &["flag"], &options, &strict)
        .unwrap());
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn unknown_name_and_bad_arguments() {
    let err = Conditional::from_name("is_purple").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownPredicate(_)));

    let err = Conditional::AnyEqual
        .test(&sample_record(), &["subject"], &Options::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { .. }));

    let err = Conditional::AnyMatch
        .test(&sample_record(), &["subject", "("], &Options::new())
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn every_predicate_has_a_name() {
    for conditional in Conditional::ALL {
        assert_eq!(Conditional::from_name(conditional.name()).unwrap(), conditional);
    }
}
