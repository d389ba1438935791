//! Handler lookup against the host application registry.
//!
//! The registry is queried on every call; defaults may change between two
//! requests and nothing here caches an answer.

use std::sync::Arc;

use serde::Serialize;

use super::error::PortalError;
use crate::core::constants::content_class;
use crate::host::AppRegistry;

/// An application able to open a content class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HandlerCandidate {
    /// Desktop file id, e.g. `org.gnome.Nautilus.desktop`.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
}

impl HandlerCandidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into() }
    }
}

/// Default-handler queries.
#[derive(Clone)]
pub struct HandlerDirectory {
    registry: Arc<dyn AppRegistry>,
}

impl HandlerDirectory {
    #[must_use]
    pub fn new(registry: Arc<dyn AppRegistry>) -> Self { Self { registry } }

    /// Returns the default handler for `content_class`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoHandlerFound`] when nothing is registered.
    pub fn default_handler_for(&self, content_class: &str) -> Result<HandlerCandidate, PortalError> {
        self.registry
            .default_handler(content_class)
            .ok_or_else(|| PortalError::no_handler(content_class))
    }

    /// Returns the default file manager.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoHandlerFound`] when no file manager is registered.
    pub fn directory_handler(&self) -> Result<HandlerCandidate, PortalError> {
        self.default_handler_for(content_class::DIRECTORY)
    }

    /// Returns every registered handler, default first.
    #[must_use]
    pub fn all_handlers_for(&self, content_class: &str) -> Vec<HandlerCandidate> {
        self.registry.all_handlers(content_class)
    }
}

impl std::fmt::Debug for HandlerDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDirectory").finish_non_exhaustive()
    }
}
