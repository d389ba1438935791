//! Integration tests for termappchooser.
//!
//! These tests drive the portal dispatcher end to end against the in-memory
//! host fakes from `termappchooser_lib::testing`. No session bus, desktop
//! entries or notification server are needed.
//!
//! ## Running Integration Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p termappchooser --test integration
//!
//! # Run one module
//! cargo test -p termappchooser --test integration portal__open_file
//! ```
//!
//! ## Test Organization
//!
//! Tests follow the naming convention `<module>__<test_name>` to allow filtering by module:
//! - `portal__*` - Request pipeline tests, one file per portal operation
//! - `host__*` - Host services against real files and XDG trees

// Allow double-underscore naming for test modules (e.g., portal__open_uri)
#![allow(non_snake_case)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_clone,
    clippy::wildcard_imports
)]

mod common;

// Portal operations
mod portal__choose_application;
mod portal__open_directory;
mod portal__open_file;
mod portal__open_uri;
mod portal__scheme_supported;

// Notification delivery
mod portal__notifications;

// Host services
mod host__xdg_pipeline;
