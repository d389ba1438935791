//! Single-attempt handler launch.

use std::sync::Arc;

use super::descriptor::ResourceDescriptor;
use super::error::PortalError;
use super::handlers::HandlerCandidate;
use crate::host::{AppLauncher, HostLaunchError};

/// Per-request information forwarded to the launched application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchContext {
    /// App id of the sandboxed caller.
    pub requester_app: String,
    /// Window-activation token from the portal options.
    pub activation_token: Option<String>,
}

/// What happened when a handler was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub succeeded: bool,
    /// Host message for a failed launch; `None` when the host gave none.
    pub error_detail: Option<String>,
    pub handler_display_name: Option<String>,
}

impl LaunchOutcome {
    #[must_use]
    pub fn success(handler: &HandlerCandidate) -> Self {
        Self {
            succeeded: true,
            error_detail: None,
            handler_display_name: Some(handler.display_name.clone()),
        }
    }

    #[must_use]
    pub fn failure(handler: &HandlerCandidate, error_detail: Option<String>) -> Self {
        Self {
            succeeded: false,
            error_detail,
            handler_display_name: Some(handler.display_name.clone()),
        }
    }

    /// Converts the outcome into the pipeline's result.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::LaunchFailed`] carrying the detail for a failed launch.
    pub fn into_result(self) -> Result<Self, PortalError> {
        if self.succeeded {
            Ok(self)
        } else {
            Err(PortalError::LaunchFailed { detail: self.error_detail })
        }
    }
}

/// Starts handlers through the host launcher.
#[derive(Clone)]
pub struct LaunchExecutor {
    launcher: Arc<dyn AppLauncher>,
}

impl LaunchExecutor {
    #[must_use]
    pub fn new(launcher: Arc<dyn AppLauncher>) -> Self { Self { launcher } }

    /// Launches `handler` once with the descriptor's target. Never retries.
    #[must_use]
    pub fn launch(
        &self,
        handler: &HandlerCandidate,
        descriptor: &ResourceDescriptor,
        context: &LaunchContext,
    ) -> LaunchOutcome {
        let uris = [descriptor.target()];

        match self.launcher.launch(handler, &uris, context) {
            Ok(()) => LaunchOutcome::success(handler),
            Err(HostLaunchError::Failed(message)) => LaunchOutcome::failure(handler, Some(message)),
            Err(HostLaunchError::Refused) => LaunchOutcome::failure(handler, None),
        }
    }
}

impl std::fmt::Debug for LaunchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchExecutor").finish_non_exhaustive()
    }
}
