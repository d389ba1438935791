//! Request-level failures.
//!
//! Every variant ends the request with a failure reply. None of them stops
//! the process.

use thiserror::Error;

/// Why a portal request could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// A transferred descriptor could not be turned into a path.
    #[error("failed to resolve resource: {reason}")]
    ResourceResolution { reason: String },

    /// No application is registered for the content class.
    #[error("no application found for content type: {content_class}")]
    NoHandlerFound { content_class: String },

    /// The host refused or failed to start the handler.
    #[error("failed to launch application{}", detail_suffix(.detail))]
    LaunchFailed { detail: Option<String> },

    /// The chooser produced no decision.
    #[error("no application was chosen")]
    NoChoice,
}

impl PortalError {
    /// Creates a resource resolution error.
    pub fn resolution(reason: impl Into<String>) -> Self {
        Self::ResourceResolution { reason: reason.into() }
    }

    /// Creates a missing-handler error.
    pub fn no_handler(content_class: impl Into<String>) -> Self {
        Self::NoHandlerFound { content_class: content_class.into() }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|detail| format!(": {detail}")).unwrap_or_default()
}
