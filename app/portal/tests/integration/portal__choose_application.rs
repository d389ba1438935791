//! Integration tests for `AppChooser.ChooseApplication` and `UpdateChoices`.

use serde_json::json;
use termappchooser_lib::portal::{ChoiceRequest, LastChoice};

use crate::common::*;

fn request(choices: &[&str]) -> ChoiceRequest {
    ChoiceRequest {
        handle: "/org/freedesktop/portal/desktop/request/1_42/c1".into(),
        requester_app: "org.example.Reader".into(),
        presentation_handle: "wayland:abc".into(),
        candidates: choices.iter().map(ToString::to_string).collect(),
        options: Options::new(),
    }
}

#[test]
fn test_first_choice_is_returned() {
    let harness = PortalHarness::new();
    let reply = harness
        .dispatcher()
        .choose_application(&request(&["org.gnome.Evince.desktop", "okular.desktop"]));

    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(reply.results.get("choice"), Some(&json!("org.gnome.Evince.desktop")));
    assert_eq!(reply.results.len(), 1);
}

#[test]
fn test_empty_choices_fail_with_empty_results() {
    let harness = PortalHarness::new();
    let reply = harness.dispatcher().choose_application(&request(&[]));

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(reply.results.is_empty());
}

#[test]
fn test_choose_does_not_touch_host() {
    let harness = PortalHarness::new();
    let _ = harness.dispatcher().choose_application(&request(&["a.desktop"]));

    assert!(harness.launcher.launches().is_empty());
    assert!(harness.registry.queries().is_empty());
    assert!(harness.notifications().is_empty());
}

#[test]
fn test_update_choices_has_no_effect() {
    let harness = PortalHarness::new();
    let req = request(&["a.desktop", "b.desktop"]);

    harness.dispatcher().update_choices(&req.handle, &["b.desktop".to_string()]);
    harness.dispatcher().update_choices("/not/a/known/request", &[]);

    let reply = harness.dispatcher().choose_application(&req);
    assert_eq!(reply.results.get("choice"), Some(&json!("a.desktop")));
}

#[test]
fn test_last_choice_policy_honours_option() {
    let harness = PortalHarness::with_policy(Box::new(LastChoice));
    let mut req = request(&["a.desktop", "b.desktop"]);
    req.options = option("last_choice", "b.desktop");

    let reply = harness.dispatcher().choose_application(&req);
    assert_eq!(reply.results.get("choice"), Some(&json!("b.desktop")));
}

#[test]
fn test_last_choice_policy_with_empty_choices_still_fails() {
    let harness = PortalHarness::with_policy(Box::new(LastChoice));
    let mut req = request(&[]);
    req.options = option("last_choice", "b.desktop");

    assert_eq!(harness.dispatcher().choose_application(&req).response, ResponseCode::Failure);
}
