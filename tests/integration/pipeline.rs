//! Triples to transformed records

use recflow_engine::{EngineConfig, Guard, Rule, RuleSet, RuleStage};
use recflow_foundation::ErrorKind;
use recflow_stream::{NestingValidator, RecordBuilder, StreamPipe};
use recflow_triples::{Triple, TripleCollect};

use crate::catalogue;

fn rules() -> RuleSet {
    RuleSet::new()
        .with_rule(Rule::new("title").with_target("dc:title"))
        .with_rule(Rule::new("creator.name").with_target("dc:creator"))
        .with_rule(
            Rule::new("type")
                .with_target("dc:type")
                .with_constant("Text")
                .with_guard(Guard::parse("any_equal", ["type", "novel"]).unwrap()),
        )
}

type Pipeline = TripleCollect<NestingValidator<RuleStage<RecordBuilder>>>;

fn pipeline(config: EngineConfig) -> Pipeline {
    TripleCollect::new(NestingValidator::with_limits(
        RuleStage::with_config(rules(), config.clone(), RecordBuilder::new()),
        config.stream_limits(),
    ))
}

#[test]
fn catalogue_is_transformed() {
    let mut pipeline = pipeline(EngineConfig::default());
    pipeline.process_all(&catalogue()).unwrap();
    pipeline.close_stream().unwrap();

    let stage = pipeline.receiver_mut().receiver_mut();
    assert_eq!(stage.records_emitted(), 3);
    let records: Vec<String> = stage
        .receiver_mut()
        .finished()
        .map(|record| record.to_string())
        .collect();
    assert_eq!(
        records,
        vec![
            "urn:1: {dc:title: Faust, dc:creator: Goethe}",
            "urn:2: {dc:title: Die Leiden des jungen Werthers, dc:creator: Goethe, dc:type: Text}",
            "urn:3: {dc:title: Untitled}",
        ]
    );
}

#[test]
fn strict_config_limits_depth() {
    let config = EngineConfig::strict().with_max_entity_depth(1);
    let mut pipeline = pipeline(config);
    let err = pipeline
        .process(&Triple::entity("urn:9", "creator", "{ place { city: Weimar } }"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(err.context.unwrap().record.as_deref(), Some("urn:9"));
}

#[test]
fn records_without_output_are_skipped_when_configured() {
    let config = EngineConfig::default().with_emit_empty_records(false);
    let mut pipeline = pipeline(config);
    pipeline
        .process_all(&[Triple::new("urn:5", "unmapped", "x")])
        .unwrap();
    pipeline.close_stream().unwrap();
    let stage = pipeline.into_receiver().into_receiver();
    assert_eq!(stage.records_skipped(), 1);
    assert_eq!(stage.into_receiver().finished().count(), 0);
}
