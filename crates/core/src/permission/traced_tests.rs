use super::*;
use crate::permission::FakeOracle;
use crate::topic::TopicPattern;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_tracing<T>(f: impl FnOnce() -> T) -> (String, T) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

#[test]
fn passes_decisions_through() {
    let fake = FakeOracle::new();
    fake.deny(
        "bob",
        TopicPattern::new("secret/*").unwrap(),
        TopicAction::Publish,
    );
    let traced = TracedOracle::new(fake.clone());

    let secret = Topic::new("secret/plans").unwrap();
    assert_eq!(
        traced.authorize(&"bob".into(), &secret, TopicAction::Publish),
        Decision::Deny
    );
    assert_eq!(
        traced.authorize(&"bob".into(), &secret, TopicAction::Subscribe),
        Decision::Allow
    );
    assert_eq!(fake.calls().len(), 2);
}

#[test]
fn logs_denials_with_context() {
    let fake = FakeOracle::new();
    fake.deny(
        "bob",
        TopicPattern::new("*").unwrap(),
        TopicAction::Subscribe,
    );
    let traced = TracedOracle::new(fake);

    let (logs, decision) = with_tracing(|| {
        traced.authorize(
            &"bob".into(),
            &Topic::new("a/b").unwrap(),
            TopicAction::Subscribe,
        )
    });

    assert_eq!(decision, Decision::Deny);
    assert!(logs.contains("permission denied"), "logs: {logs}");
    assert!(logs.contains("principal=bob"), "logs: {logs}");
    assert!(logs.contains("topic=a/b"), "logs: {logs}");
    assert!(logs.contains("action=subscribe"), "logs: {logs}");
}
