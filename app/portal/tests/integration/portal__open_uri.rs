//! Integration tests for `OpenURI.OpenURI`.

use crate::common::*;

#[test]
fn test_https_opens_in_browser() {
    let harness = desktop();
    let reply = harness.dispatcher().open_uri(&harness.call(), "https://example.com/docs", &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    assert!(reply.results.is_empty());
    assert_eq!(harness.registry.queries(), vec!["text/html"]);

    let launches = harness.launcher.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].handler.id, "firefox.desktop");
    assert_eq!(launches[0].uris, vec!["https://example.com/docs"]);
}

#[test]
fn test_mailto_opens_in_mail_client() {
    let harness = desktop();
    let reply =
        harness.dispatcher().open_uri(&harness.call(), "mailto:someone@example.com", &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(harness.registry.queries(), vec!["message/rfc822"]);
    assert_eq!(harness.launcher.launches()[0].handler.display_name, "aerc");
}

#[test]
fn test_unknown_scheme_looks_up_octet_stream() {
    let harness = desktop();
    let reply = harness.dispatcher().open_uri(&harness.call(), "gopher://example.com", &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert_eq!(harness.registry.queries(), vec!["application/octet-stream"]);
    assert!(harness.launcher.launches().is_empty());
}

#[test]
fn test_no_handler_fails_without_launch() {
    let harness = PortalHarness::new();
    let reply = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(reply.results.is_empty());
    assert!(harness.launcher.launches().is_empty());
    assert!(harness.notifications().is_empty());
}

#[test]
fn test_launch_failure_with_message_fails_request() {
    let harness = desktop();
    harness.launcher.set_behavior(LaunchBehavior::Fail("No such file or directory".into()));

    let reply = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &Options::new());
    assert_eq!(reply.response, ResponseCode::Failure);
    assert_eq!(harness.launcher.launches().len(), 1);
    assert!(harness.notifications().is_empty());
}

#[test]
fn test_silent_launch_refusal_fails_request() {
    let harness = desktop();
    harness.launcher.set_behavior(LaunchBehavior::Refuse);

    let reply = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &Options::new());
    assert_eq!(reply.response, ResponseCode::Failure);
    assert_eq!(harness.launcher.launches().len(), 1);
}

#[test]
fn test_success_notifies_with_handler_and_uri() {
    let harness = desktop();
    let _ = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &Options::new());

    let notifications = harness.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].app_name, "XDG Portal");
    assert_eq!(notifications[0].summary, "Opened with Firefox");
    assert_eq!(notifications[0].body, "Target: https://example.com");
}

#[test]
fn test_identical_requests_are_independent() {
    let harness = desktop();
    let call = harness.call();

    let first = harness.dispatcher().open_uri(&call, "https://example.com", &Options::new());
    let second = harness.dispatcher().open_uri(&call, "https://example.com", &Options::new());

    assert_eq!(first.response, ResponseCode::Success);
    assert_eq!(second.response, ResponseCode::Success);
    assert_eq!(harness.launcher.launches().len(), 2);
    assert_eq!(harness.registry.queries().len(), 2);
}

#[test]
fn test_concurrent_requests_all_launch() {
    let harness = desktop();

    std::thread::scope(|scope| {
        for n in 0..8 {
            let harness = &harness;
            scope.spawn(move || {
                let uri = format!("https://example.com/{n}");
                let reply = harness.dispatcher().open_uri(&harness.call(), &uri, &Options::new());
                assert_eq!(reply.response, ResponseCode::Success);
            });
        }
    });

    assert_eq!(harness.launcher.launches().len(), 8);
}

#[test]
fn test_activation_token_and_requester_reach_launcher() {
    let harness = desktop();
    let options = option("activation_token", "xdg-token-17");

    let _ = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &options);

    let launch = &harness.launcher.launches()[0];
    assert_eq!(launch.context.activation_token.as_deref(), Some("xdg-token-17"));
    assert_eq!(launch.context.requester_app, "org.example.Reader");
}
