//! Integration tests for `OpenURI.SchemeSupported`.

use crate::common::*;

#[test]
fn test_allow_listed_schemes() {
    let harness = PortalHarness::new();
    for scheme in ["http", "https", "ftp", "mailto", "file", "magnet"] {
        assert!(harness.dispatcher().scheme_supported(scheme, &Options::new()), "{scheme}");
    }
}

#[test]
fn test_unlisted_schemes() {
    let harness = PortalHarness::new();
    for scheme in ["gopher", "irc", "", "http:"] {
        assert!(!harness.dispatcher().scheme_supported(scheme, &Options::new()), "{scheme}");
    }
}

#[test]
fn test_scheme_check_is_case_insensitive() {
    let harness = PortalHarness::new();
    assert!(harness.dispatcher().scheme_supported("HTTPS", &Options::new()));
    assert!(harness.dispatcher().scheme_supported("Mailto", &Options::new()));
}

#[test]
fn test_scheme_check_has_no_side_effects() {
    let harness = desktop();
    let _ = harness.dispatcher().scheme_supported("https", &option("ignored", "yes"));

    assert!(harness.registry.queries().is_empty());
    assert!(harness.launcher.launches().is_empty());
    assert!(harness.notifications().is_empty());
}
