//! Integration tests for `OpenURI.OpenDirectory`.

use crate::common::*;

#[test]
fn test_directory_opens_in_file_manager() {
    let harness = desktop();
    harness.descriptors.resolve_to("/home/user/Pictures");

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_directory(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Success);
    let launches = harness.launcher.launches();
    assert_eq!(launches[0].handler.id, "yazi.desktop");
    assert_eq!(launches[0].uris, vec!["file:///home/user/Pictures"]);
    assert_eq!(harness.notifications()[0].body, "Target: Pictures");
}

#[test]
fn test_directory_lookup_ignores_detected_class() {
    let harness = desktop();
    harness.descriptors.resolve_to("/home/user/site");
    harness.classifier.set_class("/home/user/site", "text/html");

    let fd = OpenDescriptor::new();
    let _ = harness.dispatcher().open_directory(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(harness.registry.queries(), vec!["inode/directory"]);
    assert!(harness.classifier.queried().is_empty());
    assert_eq!(harness.launcher.launches()[0].handler.id, "yazi.desktop");
}

#[test]
fn test_missing_file_manager_fails() {
    let harness = PortalHarness::new();
    harness.descriptors.resolve_to("/home/user");

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_directory(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(harness.launcher.launches().is_empty());
}

#[test]
fn test_unreadable_directory_descriptor_fails() {
    let harness = desktop();
    harness.descriptors.fail();

    let fd = OpenDescriptor::new();
    let reply = harness.dispatcher().open_directory(&harness.call(), fd.fd(), &Options::new());

    assert_eq!(reply.response, ResponseCode::Failure);
    assert!(harness.registry.queries().is_empty());
    assert!(harness.launcher.launches().is_empty());
}
