//! Application constants for termappchooser.
//!
//! This module contains the bus identity of the service, the content
//! classes the pipeline falls back to, and other static values.

/// The application name.
pub const APP_NAME: &str = "termappchooser";

/// Application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known bus name the backend registers on the session bus.
pub const BUS_NAME: &str = "org.freedesktop.impl.portal.desktop.termappchooser";

/// Object path both portal interfaces are exported at.
pub const OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";

/// Portal interface names.
pub mod interfaces {
    /// The "pick an application" contract.
    pub const APP_CHOOSER: &str = "org.freedesktop.impl.portal.AppChooser";

    /// The "open a resource" contract.
    pub const OPEN_URI: &str = "org.freedesktop.impl.portal.OpenURI";
}

/// Content classifications the pipeline produces on its own.
pub mod content_class {
    /// Class for `http` and `https` URIs.
    pub const HYPERTEXT: &str = "text/html";

    /// Class for `mailto` URIs.
    pub const MESSAGE: &str = "message/rfc822";

    /// Fallback class when nothing better is known.
    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Class used to find the file manager.
    pub const DIRECTORY: &str = "inode/directory";

    /// Class for plain text detected by the text heuristic, and the
    /// implicit parent of every `text/*` class.
    pub const PLAIN_TEXT: &str = "text/plain";

    /// Class for empty regular files.
    pub const ZERO_SIZE: &str = "application/x-zerosize";
}

/// Schemes answered positively by `SchemeSupported`.
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "file", "magnet"];

/// Display name used when a desktop entry has no `Name` key.
pub const UNKNOWN_APPLICATION: &str = "Unknown Application";

/// Notification defaults.
pub mod notification {
    /// Application name shown on launch notifications.
    pub const DEFAULT_APP_NAME: &str = "XDG Portal";
}

/// Default configuration file names.
pub mod config {
    /// Directory below the XDG config home.
    pub const CONFIG_DIR: &str = "termappchooser";

    /// Primary config file name.
    pub const CONFIG_FILE: &str = "config.jsonc";

    /// Alternative config file name (JSON without comments).
    pub const CONFIG_FILE_ALT: &str = "config.json";
}
