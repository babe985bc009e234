use super::*;
use crate::event::{Event, Properties};
use crate::handler::{EventHandler, HandlerError};
use crate::id::HandlerId;
use crate::registry::Subscription;
use crate::topic::TopicPattern;
use std::time::Instant;

const WAIT: Duration = Duration::from_secs(5);

fn recording(log: &Arc<Mutex<Vec<String>>>) -> Arc<Subscription> {
    let log = log.clone();
    let handler: Arc<dyn EventHandler> = Arc::new(move |event: &Event| -> Result<(), HandlerError> {
        let thread = thread::current().name().unwrap_or("").to_string();
        log.lock()
            .unwrap()
            .push(format!("{}@{}", event.topic(), thread));
        Ok(())
    });
    Arc::new(Subscription {
        id: HandlerId::new("rec"),
        patterns: vec![TopicPattern::new("*").unwrap()],
        principal: "p".into(),
        handler,
    })
}

fn job(topic: &str, target: &Arc<Subscription>) -> DeliveryJob {
    DeliveryJob::new(
        Event::parse(topic, Properties::new()).unwrap(),
        vec![Arc::clone(target)],
    )
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn starts_without_worker() {
    let dispatcher = Dispatcher::default();
    assert!(!dispatcher.is_worker_running());
    assert_eq!(dispatcher.pending(), 0);
    assert_eq!(dispatcher.workers_spawned(), 0);
    assert!(dispatcher.wait_idle(Duration::from_millis(1)));
}

#[test]
fn delivers_in_enqueue_order_on_worker_thread() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let target = recording(&log);
    let dispatcher = Dispatcher::new(DispatcherConfig::default().with_thread_name("test-dispatch"));

    for topic in ["e/1", "e/2", "e/3", "e/4"] {
        dispatcher.enqueue(job(topic, &target)).unwrap();
    }

    assert!(dispatcher.wait_idle(WAIT));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "e/1@test-dispatch",
            "e/2@test-dispatch",
            "e/3@test-dispatch",
            "e/4@test-dispatch",
        ]
    );
    assert_eq!(dispatcher.workers_spawned(), 1);
}

#[test]
fn idle_worker_exits_and_is_respawned() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let target = recording(&log);
    let dispatcher = Dispatcher::new(
        DispatcherConfig::default().with_idle_timeout(Duration::from_millis(20)),
    );

    dispatcher.enqueue(job("first", &target)).unwrap();
    assert!(dispatcher.wait_idle(WAIT));
    assert!(wait_until(|| !dispatcher.is_worker_running()));
    assert_eq!(dispatcher.workers_spawned(), 1);

    dispatcher.enqueue(job("second", &target)).unwrap();
    assert!(dispatcher.wait_idle(WAIT));
    assert_eq!(dispatcher.workers_spawned(), 2);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn busy_worker_is_reused() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let target = recording(&log);
    let dispatcher = Dispatcher::default();

    for i in 0..20 {
        dispatcher.enqueue(job(&format!("e/{i}"), &target)).unwrap();
    }
    assert!(dispatcher.wait_idle(WAIT));
    dispatcher.enqueue(job("late", &target)).unwrap();
    assert!(dispatcher.wait_idle(WAIT));

    assert!(dispatcher.is_worker_running());
    assert_eq!(dispatcher.workers_spawned(), 1);
    assert_eq!(log.lock().unwrap().len(), 21);
}

#[test]
fn failing_handler_does_not_kill_worker() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let good = recording(&log);
    let bad_handler: Arc<dyn EventHandler> =
        Arc::new(|_: &Event| -> Result<(), HandlerError> { panic!("bad handler") });
    let bad = Arc::new(Subscription {
        id: HandlerId::new("bad"),
        patterns: vec![TopicPattern::new("*").unwrap()],
        principal: "p".into(),
        handler: bad_handler,
    });
    let dispatcher = Dispatcher::default();

    dispatcher.enqueue(job("one", &bad)).unwrap();
    dispatcher.enqueue(job("two", &good)).unwrap();
    assert!(dispatcher.wait_idle(WAIT));

    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(dispatcher.workers_spawned(), 1);
    assert!(dispatcher.is_worker_running());
}

#[test]
fn wait_idle_times_out_while_handler_blocks() {
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    let handler: Arc<dyn EventHandler> = Arc::new(move |_: &Event| -> Result<(), HandlerError> {
        let _ = release_rx.lock().unwrap().recv();
        Ok(())
    });
    let blocking = Arc::new(Subscription {
        id: HandlerId::new("slow"),
        patterns: vec![TopicPattern::new("*").unwrap()],
        principal: "p".into(),
        handler,
    });
    let dispatcher = Dispatcher::default();

    dispatcher.enqueue(job("slow", &blocking)).unwrap();
    assert!(!dispatcher.wait_idle(Duration::from_millis(30)));

    release_tx.send(()).unwrap();
    assert!(dispatcher.wait_idle(WAIT));
}

#[test]
fn config_parses_humantime() {
    let config: DispatcherConfig = toml::from_str(
        r#"
        idle_timeout = "250ms"
        "#,
    )
    .unwrap();
    assert_eq!(config.idle_timeout, Duration::from_millis(250));
    assert_eq!(config.thread_name, "ea-dispatch");
}
