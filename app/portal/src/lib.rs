//! termappchooser - an xdg-desktop-portal backend.
//!
//! Implements `org.freedesktop.impl.portal.AppChooser` and
//! `org.freedesktop.impl.portal.OpenURI` for desktops without a native
//! portal backend. Requests are classified, resolved to the default handler
//! through the XDG MIME-apps registry and launched directly.
//!
//! - [`portal`] - the request pipeline, independent of D-Bus
//! - [`host`] - Linux/XDG implementations of the host services
//! - [`bus`] - zbus interface objects and service startup
//! - [`cli`] - command-line entry point

pub mod bus;
pub mod cli;
pub mod config;
pub mod core;
pub mod host;
pub mod logging;
pub mod portal;
pub mod testing;
