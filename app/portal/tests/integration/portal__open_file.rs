//! Integration tests for `OpenURI.OpenFile`.

use std::path::PathBuf;

use crate::common::*;

#[test]
fn test_file_opens_with_class_handler() {
    let harness = PortalHarness::new();
    harness.descriptors.resolve_to("/home/user/Documents/report.pdf");
    harness.classifier.set_class("/home/user/Documents/report.pdf", "application/pdf");
    harness.registry.register("application/pdf", "org.pwmt.zathura.desktop", "Zathura");

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_file(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(harness.registry.queries(), vec!["application/pdf"]);

    let launches = harness.launcher.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].uris, vec!["file:///home/user/Documents/report.pdf"]);

    let notifications = harness.notifications();
    assert_eq!(notifications[0].summary, "Opened with Zathura");
    assert_eq!(notifications[0].body, "Target: report.pdf");
}

#[test]
fn test_unreadable_descriptor_fails_before_lookup() {
    let harness = desktop();
    harness.descriptors.fail();

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_file(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(reply.results.is_empty());
    assert!(harness.classifier.queried().is_empty());
    assert!(harness.registry.queries().is_empty());
    assert!(harness.launcher.launches().is_empty());
}

#[test]
fn test_unclassified_file_uses_octet_stream() {
    let harness = PortalHarness::new();
    harness.descriptors.resolve_to("/tmp/blob.bin");
    harness.registry.register("application/octet-stream", "hexyl.desktop", "hexyl");

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_file(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    assert_eq!(harness.classifier.queried(), vec![PathBuf::from("/tmp/blob.bin")]);
    assert_eq!(harness.registry.queries(), vec!["application/octet-stream"]);
}

#[test]
fn test_path_with_spaces_is_percent_encoded() {
    let harness = PortalHarness::new();
    harness.descriptors.resolve_to("/home/user/My Notes.txt");
    harness.classifier.set_class("/home/user/My Notes.txt", "text/plain");
    harness.registry.register("text/plain", "helix.desktop", "Helix");

    let fd = OpenDescriptor::new();
    let _ = harness.dispatcher().open_file(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(harness.launcher.launches()[0].uris, vec!["file:///home/user/My%20Notes.txt"]);
}

#[test]
fn test_launch_failure_fails_file_request() {
    let harness = PortalHarness::new();
    harness.descriptors.resolve_to("/tmp/a.txt");
    harness.classifier.set_class("/tmp/a.txt", "text/plain");
    harness.registry.register("text/plain", "helix.desktop", "Helix");
    harness.launcher.set_behavior(LaunchBehavior::Fail("Permission denied".into()));

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_file(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(harness.notifications().is_empty());
}
