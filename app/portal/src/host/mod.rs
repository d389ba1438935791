//! Host services consumed by the portal pipeline.
//!
//! The pipeline never touches the operating system directly. Every host
//! interaction goes through one of the narrow traits in [`traits`], and this
//! module provides the Linux/XDG implementations:
//!
//! - [`proc_fd`] - recovers paths of transferred descriptors via `/proc/self/fd`
//! - [`content_type`] - MIME sniffing for local files
//! - [`registry`] - default handler lookup through `mimeapps.list` and desktop entries
//! - [`mime_db`] - shared-mime-info aliases and parent classes for lookup fallback
//! - [`launch`] - starts desktop entries with a target list
//! - [`notifications`] - `org.freedesktop.Notifications` client

pub mod content_type;
pub mod desktop_entry;
pub mod exec;
pub mod keyfile;
pub mod launch;
pub mod mime_db;
pub mod notifications;
pub mod proc_fd;
pub mod registry;
pub mod traits;
pub mod xdg;

use std::sync::Arc;

pub use traits::{AppLauncher, AppRegistry, ContentClassifier, DescriptorResolver, HostLaunchError, Notifier};

use crate::config::PortalConfig;

/// The set of host collaborators a dispatcher is built from.
///
/// All members are shared, thread-safe handles; cloning is cheap.
#[derive(Clone)]
pub struct HostServices {
    /// Turns transferred descriptors into paths.
    pub descriptors: Arc<dyn DescriptorResolver>,
    /// Classifies local files.
    pub classifier: Arc<dyn ContentClassifier>,
    /// Answers default-handler queries.
    pub registry: Arc<dyn AppRegistry>,
    /// Starts handler applications.
    pub launcher: Arc<dyn AppLauncher>,
}

impl HostServices {
    /// Builds the Linux/XDG host services from the process environment.
    #[must_use]
    pub fn xdg(config: &PortalConfig) -> Self {
        let dirs = xdg::XdgDirs::from_env();
        Self {
            descriptors: Arc::new(proc_fd::ProcSelfFd),
            classifier: Arc::new(content_type::MimeSniffer),
            registry: Arc::new(registry::XdgAppRegistry::new(dirs.clone())),
            launcher: Arc::new(launch::DesktopEntryLauncher::new(
                dirs.application_dirs(),
                config.launch.terminal_command(),
            )),
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
