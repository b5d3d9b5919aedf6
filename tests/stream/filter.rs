//! Integration tests for the record filter

use recflow_foundation::Result;
use recflow_stream::{
    EventCollector, Filter, SingleValue, StreamEvent, StreamPipe, StreamReceiver,
};

use crate::feed;

/// Decides by the value of the literal named `flag`.
struct FlagDecision {
    out: SingleValue,
}

impl StreamReceiver for FlagDecision {
    fn start_record(&mut self, id: &str) -> Result<()> {
        self.out.start_record(id)
    }

    fn end_record(&mut self) -> Result<()> {
        self.out.end_record()
    }

    fn start_entity(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        Ok(())
    }

    fn literal(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "flag" && value == "keep" {
            self.out.literal("", "yes")?;
        }
        Ok(())
    }

    fn reset_stream(&mut self) -> Result<()> {
        self.out.reset_stream()
    }

    fn close_stream(&mut self) -> Result<()> {
        self.out.close_stream()
    }
}

impl StreamPipe for FlagDecision {
    type Receiver = SingleValue;

    fn receiver(&self) -> &SingleValue {
        &self.out
    }

    fn receiver_mut(&mut self) -> &mut SingleValue {
        &mut self.out
    }

    fn into_receiver(self) -> SingleValue {
        self.out
    }
}

fn filter() -> Filter<FlagDecision, EventCollector> {
    Filter::new(
        FlagDecision {
            out: SingleValue::new(),
        },
        EventCollector::new(),
    )
}

fn record(id: &str, flag: &str) -> Vec<StreamEvent> {
    vec![
        StreamEvent::start_record(id),
        StreamEvent::start_entity("meta"),
        StreamEvent::literal("flag", flag),
        StreamEvent::EndEntity,
        StreamEvent::literal("title", "t"),
        StreamEvent::EndRecord,
    ]
}

#[test]
fn passing_record_is_forwarded_verbatim() {
    let mut filter = filter();
    let events = record("1", "keep");
    feed(&mut filter, &events).unwrap();
    assert_eq!(filter.receiver().events(), events.as_slice());
}

#[test]
fn mixed_stream_keeps_only_passing_records() {
    let mut filter = filter();
    for (id, flag) in [("1", "keep"), ("2", "drop"), ("3", "keep"), ("4", "")] {
        feed(&mut filter, &record(id, flag)).unwrap();
    }
    feed(&mut filter, &[StreamEvent::CloseStream]).unwrap();
    assert_eq!(filter.receiver().record_ids(), vec!["1", "3"]);
    assert_eq!(filter.records_passed(), 2);
    assert_eq!(filter.records_dropped(), 2);
    assert_eq!(filter.receiver().events().last(), Some(&StreamEvent::CloseStream));
}

#[test]
fn reset_mid_record_discards_partial() {
    let mut filter = filter();
    feed(&mut filter, &record("1", "keep")[..3]).unwrap();
    feed(&mut filter, &[StreamEvent::ResetStream]).unwrap();
    feed(&mut filter, &record("2", "keep")).unwrap();
    assert_eq!(filter.receiver().record_ids(), vec!["2"]);
    assert_eq!(filter.receiver().events()[0], StreamEvent::ResetStream);
}
