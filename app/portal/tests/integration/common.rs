//! Shared helpers for the integration tests.

use std::fs::File;
use std::os::fd::{AsFd, BorrowedFd};

pub use termappchooser_lib::portal::{Options, ResponseCode};
pub use termappchooser_lib::testing::{LaunchBehavior, PortalHarness};

/// A real, open descriptor to hand to the dispatcher.
pub struct OpenDescriptor {
    file: File,
}

impl OpenDescriptor {
    pub fn new() -> Self { Self { file: tempfile::tempfile().expect("create temp file") } }

    pub fn fd(&self) -> BorrowedFd<'_> { self.file.as_fd() }
}

/// Options map with a single string entry.
pub fn option(key: &str, value: &str) -> Options {
    let mut options = Options::new();
    options.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    options
}

/// A harness with a browser, a mail client and a file manager registered.
pub fn desktop() -> PortalHarness {
    let harness = PortalHarness::new();
    harness.registry.register("text/html", "firefox.desktop", "Firefox");
    harness.registry.register("message/rfc822", "aerc.desktop", "aerc");
    harness.registry.register("inode/directory", "yazi.desktop", "Yazi");
    harness
}
