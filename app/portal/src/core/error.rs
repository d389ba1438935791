//! Unified error types for termappchooser.
//!
//! Request-level failures live in [`crate::portal::PortalError`] and never
//! leave the dispatcher. This type covers everything that can stop the
//! process: bus startup, configuration and CLI errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Base error type for process-level failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Connecting to the session bus failed.
    #[error("Failed to connect to session bus: {0}")]
    BusConnect(String),

    /// Exporting a portal interface failed.
    #[error("Failed to export {interface}: {reason}")]
    Export { interface: &'static str, reason: String },

    /// The well-known bus name is owned by another process.
    #[error("Bus name {0} is already taken")]
    NameTaken(String),

    /// Any other bus error.
    #[error("Bus error: {0}")]
    Bus(#[from] zbus::Error),

    /// An explicitly requested configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid arguments provided.
    #[error("{0}")]
    InvalidArguments(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a bus connection error.
    pub fn bus_connect(msg: impl Into<String>) -> Self { Self::BusConnect(msg.into()) }

    /// Creates an interface export error.
    pub fn export(interface: &'static str, reason: impl Into<String>) -> Self {
        Self::Export { interface, reason: reason.into() }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_args(msg: impl Into<String>) -> Self { Self::InvalidArguments(msg.into()) }

    /// Creates a generic error.
    pub fn other(msg: impl Into<String>) -> Self { Self::Other(msg.into()) }
}
