//! Host collaborator trait definitions.
//!
//! Each trait covers exactly one host service so that alternate hosts (or
//! tests) can substitute a single mechanism without touching the pipeline.
//! Implementations must be safe to share between concurrent requests.

use std::os::fd::BorrowedFd;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::portal::{HandlerCandidate, LaunchContext, Notification, NotifyError};

/// Recovers the backing path of a descriptor received over the bus.
pub trait DescriptorResolver: Send + Sync {
    /// Returns the path the descriptor refers to.
    ///
    /// The descriptor is only borrowed; implementations must not keep it.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is invalid, closed, or does not
    /// refer to a filesystem path.
    fn resolve_descriptor_to_path(&self, fd: BorrowedFd<'_>) -> std::io::Result<PathBuf>;
}

/// Content-type detection for local paths.
pub trait ContentClassifier: Send + Sync {
    /// Returns the MIME type of `path`, or `None` when it cannot be determined.
    fn classify(&self, path: &Path) -> Option<String>;
}

/// The host's application registry.
pub trait AppRegistry: Send + Sync {
    /// Returns the default handler for a content class, if any.
    fn default_handler(&self, content_class: &str) -> Option<HandlerCandidate>;

    /// Returns every handler registered for a content class, default first.
    fn all_handlers(&self, content_class: &str) -> Vec<HandlerCandidate>;
}

/// The two failure shapes a host launch service reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostLaunchError {
    /// The host reported an explicit error.
    #[error("{0}")]
    Failed(String),
    /// The host declined to launch without giving a reason.
    #[error("launch refused")]
    Refused,
}

/// Starts a handler application against a list of targets.
pub trait AppLauncher: Send + Sync {
    /// Launches `handler` with `uris`.
    ///
    /// # Errors
    ///
    /// Returns [`HostLaunchError::Failed`] with the host's message, or
    /// [`HostLaunchError::Refused`] when the host declines silently.
    fn launch(
        &self,
        handler: &HandlerCandidate,
        uris: &[String],
        context: &LaunchContext,
    ) -> Result<(), HostLaunchError>;
}

/// Desktop notification channel.
///
/// Object-safe so a single `Arc<dyn Notifier>` can be handed to the
/// background delivery task.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a notification and returns the id the server assigned.
    async fn send(&self, notification: &Notification) -> Result<u32, NotifyError>;

    /// Releases the channel. Called once at shutdown.
    async fn close(&self) {}
}
