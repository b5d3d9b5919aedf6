//! Integration tests for rule sets and the rule stage

use recflow_engine::{EngineConfig, Guard, Rule, RuleSet, RuleStage, literal_paths};
use recflow_foundation::ErrorKind;
use recflow_stream::{EventCollector, RecordEmitter, StreamEvent, StreamPipe, StreamReceiver};

use crate::sample_record;

fn run(rules: RuleSet, config: EngineConfig) -> RuleStage<EventCollector> {
    let mut stage = RuleStage::with_config(rules, config, EventCollector::new());
    RecordEmitter::emit(&sample_record(), &mut stage).unwrap();
    stage
}

#[test]
fn literal_paths_follow_emission() {
    let paths: Vec<String> = literal_paths(&sample_record())
        .unwrap()
        .into_iter()
        .map(|(path, value)| format!("{path}={value}"))
        .collect();
    assert_eq!(
        paths,
        vec![
            "title=Faust",
            "author.name=Goethe",
            "author.born=1749",
            "subject=drama",
            "subject=poetry",
            "subject=tragedy",
            "pages=512",
            "available=true",
            "note=",
        ]
    );
}

#[test]
fn rules_fire_in_registration_order() {
    let rules: RuleSet = [
        Rule::new("author.*").with_target("creator"),
        Rule::new("title").with_target("dc:title"),
        Rule::new("t*").with_target("starts_with_t"),
    ]
    .into_iter()
    .collect();
    let matched: Vec<String> = rules.rules_for("title").iter().map(ToString::to_string).collect();
    assert_eq!(matched.len(), 2);
    assert!(matched[0].starts_with("title"));
}

#[test]
fn stage_renames_and_sets_constants() {
    let rules = RuleSet::new()
        .with_rule(Rule::new("title").with_target("dc:title"))
        .with_rule(Rule::new("author.name").with_target("dc:creator"))
        .with_rule(Rule::new("pages").with_target("format").with_constant("print"));
    let stage = run(rules, EngineConfig::default());
    assert_eq!(
        stage.receiver().events(),
        &[
            StreamEvent::start_record("r1"),
            StreamEvent::literal("dc:title", "Faust"),
            StreamEvent::literal("dc:creator", "Goethe"),
            StreamEvent::literal("format", "print"),
            StreamEvent::EndRecord,
        ]
    );
    assert_eq!(stage.records_emitted(), 1);
}

#[test]
fn guard_controls_firing() {
    let guard = Guard::parse("any_equal", ["subject", "drama"]).unwrap();
    let blocked = Guard::parse("exists", ["author.death"]).unwrap();
    let rules = RuleSet::new()
        .with_rule(Rule::new("title").with_target("drama_title").with_guard(guard))
        .with_rule(Rule::new("title").with_target("dead").with_guard(blocked));
    let stage = run(rules, EngineConfig::default());
    assert_eq!(
        stage.receiver().events()[1],
        StreamEvent::literal("drama_title", "Faust")
    );
    assert_eq!(stage.receiver().len(), 3);
}

#[test]
fn repeated_field_fires_per_value() {
    let rules = RuleSet::new().with_rule(Rule::new("subject").with_target("topic"));
    let stage = run(rules, EngineConfig::default());
    assert_eq!(stage.receiver().len(), 5);
}

#[test]
fn empty_output_obeys_config() {
    let rules = RuleSet::new().with_rule(Rule::new("missing"));

    let stage = run(rules.clone(), EngineConfig::default());
    assert_eq!(
        stage.receiver().events(),
        &[StreamEvent::start_record("r1"), StreamEvent::EndRecord]
    );

    let stage = run(rules, EngineConfig::default().with_emit_empty_records(false));
    assert!(stage.receiver().is_empty());
    assert_eq!(stage.records_skipped(), 1);
}

#[test]
fn invalid_guard_fails_at_build_time() {
    let err = Guard::parse("all_match", ["title", "[unclosed"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
    let err = Guard::parse("nope", ["x"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownPredicate(_)));
}

#[test]
fn depth_limit_is_enforced() {
    let config = EngineConfig::default().with_max_entity_depth(1);
    let mut stage = RuleStage::with_config(RuleSet::new(), config, EventCollector::new());
    stage.start_record("deep").unwrap();
    stage.start_entity("a").unwrap();
    let err = stage.start_entity("b").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(err.context.unwrap().record.as_deref(), Some("deep"));
}

#[test]
fn reset_drops_partial_record() {
    let rules = RuleSet::new().with_rule(Rule::new("title"));
    let mut stage = RuleStage::new(rules, EventCollector::new());
    stage.start_record("1").unwrap();
    stage.literal("title", "x").unwrap();
    stage.reset_stream().unwrap();
    stage.start_record("2").unwrap();
    stage.literal("title", "y").unwrap();
    stage.end_record().unwrap();
    assert_eq!(
        stage.into_receiver().into_events(),
        vec![
            StreamEvent::ResetStream,
            StreamEvent::start_record("2"),
            StreamEvent::literal("title", "y"),
            StreamEvent::EndRecord,
        ]
    );
}
