use super::*;
use crate::event::Properties;
use crate::handler::{EventHandler, HandlerError};
use crate::id::HandlerId;
use crate::topic::{Topic, TopicPattern};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn subscription(id: &str, handler: Arc<dyn EventHandler>) -> Arc<Subscription> {
    Arc::new(Subscription {
        id: HandlerId::new(id),
        patterns: vec![TopicPattern::new("*").unwrap()],
        principal: "p".into(),
        handler,
    })
}

fn recording(name: &'static str, log: &Log) -> Arc<dyn EventHandler> {
    let log = log.clone();
    Arc::new(move |event: &Event| -> Result<(), HandlerError> {
        log.lock()
            .unwrap()
            .push(format!("{name}:{}", event.topic()));
        Ok(())
    })
}

fn failing(message: &'static str) -> Arc<dyn EventHandler> {
    Arc::new(move |_: &Event| -> Result<(), HandlerError> { Err(HandlerError::new(message)) })
}

fn panicking(message: &'static str) -> Arc<dyn EventHandler> {
    Arc::new(move |_: &Event| -> Result<(), HandlerError> { panic!("{}", message) })
}

fn event(topic: &str) -> Event {
    Event::parse(topic, Properties::new()).unwrap()
}

#[test]
fn delivers_in_target_order() {
    let log = Log::default();
    let job = DeliveryJob::new(
        event("a/b"),
        vec![
            subscription("h-1", recording("one", &log)),
            subscription("h-2", recording("two", &log)),
            subscription("h-3", recording("three", &log)),
        ],
    );

    let report = deliver(&job);

    assert_eq!(report.delivered, 3);
    assert!(report.is_clean());
    assert_eq!(*log.lock().unwrap(), vec!["one:a/b", "two:a/b", "three:a/b"]);
}

#[test]
fn failing_handler_does_not_stop_later_handlers() {
    let log = Log::default();
    let job = DeliveryJob::new(
        event("a/b"),
        vec![
            subscription("h-1", failing("boom")),
            subscription("h-2", recording("two", &log)),
        ],
    );

    let report = deliver(&job);

    assert_eq!(report.delivered, 1);
    assert_eq!(report.attempted(), 2);
    assert_eq!(
        report.failures,
        vec![HandlerDeliveryError {
            handler: HandlerId::new("h-1"),
            topic: Topic::new("a/b").unwrap(),
            cause: HandlerFailure::Error("boom".to_string()),
        }]
    );
    assert_eq!(*log.lock().unwrap(), vec!["two:a/b"]);
}

#[test]
fn panicking_handler_is_contained() {
    let log = Log::default();
    let job = DeliveryJob::new(
        event("a/b"),
        vec![
            subscription("h-1", recording("one", &log)),
            subscription("h-2", panicking("handler exploded")),
            subscription("h-3", recording("three", &log)),
        ],
    );

    let report = deliver(&job);

    assert_eq!(report.delivered, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].cause,
        HandlerFailure::Panic("handler exploded".to_string())
    );
    assert_eq!(*log.lock().unwrap(), vec!["one:a/b", "three:a/b"]);
}

#[test]
fn empty_job_delivers_nothing() {
    let job = DeliveryJob::new(event("a"), Vec::new());
    assert!(job.is_empty());
    assert_eq!(deliver(&job), DeliveryReport::default());
}

#[test]
fn invoke_reports_handler_identity() {
    let sub = subscription("h-9", failing("nope"));
    let err = invoke(&sub, &event("x/y")).unwrap_err();
    assert_eq!(err.handler.as_str(), "h-9");
    assert_eq!(
        err.to_string(),
        "handler h-9 failed on x/y: returned error: nope"
    );
}

#[test]
fn job_exposes_frozen_targets() {
    let log = Log::default();
    let job = DeliveryJob::new(
        event("a"),
        vec![
            subscription("h-1", recording("one", &log)),
            subscription("h-2", recording("two", &log)),
        ],
    );
    let copy = job.clone();
    assert_eq!(
        copy.target_ids(),
        vec![HandlerId::new("h-1"), HandlerId::new("h-2")]
    );
    assert_eq!(copy.event().topic().as_str(), "a");
}
