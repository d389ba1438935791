//! Integration tests for launch notifications delivered by the background worker.

use std::sync::Arc;
use std::time::Duration;

use termappchooser_lib::host::{HostServices, Notifier};
use termappchooser_lib::portal::{CallContext, FirstCandidate, NotificationEmitter, PortalDispatcher};
use termappchooser_lib::testing::{
    FailingNotifier, FakeClassifier, FakeDescriptors, FakeLauncher, FakeRegistry, RecordingNotifier,
};

use crate::common::*;

fn dispatcher(emitter: NotificationEmitter) -> (PortalDispatcher, Arc<FakeLauncher>) {
    let registry = Arc::new(FakeRegistry::default());
    registry.register("text/html", "firefox.desktop", "Firefox");
    let launcher = Arc::new(FakeLauncher::default());

    let host = HostServices {
        descriptors: Arc::new(FakeDescriptors::default()),
        classifier: Arc::new(FakeClassifier::default()),
        registry,
        launcher: launcher.clone(),
    };
    (PortalDispatcher::new(host, Box::new(FirstCandidate), emitter), launcher)
}

fn call() -> CallContext { CallContext::new("/org/freedesktop/portal/desktop/request/1_7/n", "org.example.Chat", "") }

async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn test_notification_is_delivered_after_launch() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (emitter, worker) = NotificationEmitter::spawn(notifier.clone() as Arc<dyn Notifier>, "XDG Portal");
    let (dispatcher, _) = dispatcher(emitter);

    let reply = dispatcher.open_uri(&call(), "https://example.com", &Options::new());
    assert_eq!(reply.response, ResponseCode::Success);

    assert!(eventually(|| notifier.sent().len() == 1).await);
    let sent = notifier.sent();
    assert_eq!(sent[0].summary, "Opened with Firefox");
    assert_eq!(sent[0].body, "Target: https://example.com");

    worker.shutdown().await;
    assert!(notifier.is_closed());
}

#[tokio::test]
async fn test_notification_failure_does_not_change_reply() {
    let notifier = Arc::new(FailingNotifier::default());
    let (emitter, worker) = NotificationEmitter::spawn(notifier.clone() as Arc<dyn Notifier>, "XDG Portal");
    let (dispatcher, launcher) = dispatcher(emitter);

    let first = dispatcher.open_uri(&call(), "https://example.com/1", &Options::new());
    let second = dispatcher.open_uri(&call(), "https://example.com/2", &Options::new());

    assert_eq!(first.response, ResponseCode::Success);
    assert_eq!(second.response, ResponseCode::Success);
    assert_eq!(launcher.launches().len(), 2);
    assert!(eventually(|| notifier.attempts() == 2).await);

    worker.shutdown().await;
}

#[test]
fn test_disabled_notifications_still_succeed() {
    let (dispatcher, launcher) = dispatcher(NotificationEmitter::disabled());

    let reply = dispatcher.open_uri(&call(), "https://example.com", &Options::new());
    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(launcher.launches().len(), 1);
}
