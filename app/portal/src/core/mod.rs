//! Core infrastructure for termappchooser.
//!
//! This module provides foundational types used throughout the service:
//!
//! - [`error`] - Process-level error type
//! - [`constants`] - Bus names, content classes and other static values
//! - [`prelude`] - Common re-exports for convenience

pub mod constants;
pub mod error;
pub mod prelude;

pub use error::{Error, Result};
