//! In-memory host collaborators for exercising the portal pipeline.
//!
//! Every fake records how it was used and can be reconfigured through a
//! shared reference, so a test can build the dispatcher first and script the
//! host afterwards.
//!
//! # Usage
//!
//! ```rust,ignore
//! use termappchooser_lib::testing::PortalHarness;
//!
//! let harness = PortalHarness::new();
//! harness.registry.register("text/html", "firefox.desktop", "Firefox");
//!
//! let reply = harness.dispatcher().open_uri(&harness.call(), "https://example.com", &Default::default());
//! assert!(reply.is_success());
//! assert_eq!(harness.launcher.launches().len(), 1);
//! ```

use std::collections::HashMap;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::host::{
    AppLauncher, AppRegistry, ContentClassifier, DescriptorResolver, HostLaunchError, HostServices,
    Notifier,
};
use crate::portal::{
    CallContext, ChoicePolicy, FirstCandidate, HandlerCandidate, LaunchContext, Notification,
    NotificationEmitter, NotifyError, PortalDispatcher,
};

// ============================================================================
// Descriptors
// ============================================================================

/// Resolves every descriptor to one scripted path, or fails.
#[derive(Debug, Default)]
pub struct FakeDescriptors {
    path: Mutex<Option<PathBuf>>,
    resolved: Mutex<Vec<i32>>,
}

impl FakeDescriptors {
    /// Makes every descriptor resolve to `path`.
    pub fn resolve_to(&self, path: impl Into<PathBuf>) { *self.path.lock() = Some(path.into()); }

    /// Makes every descriptor unreadable.
    pub fn fail(&self) { *self.path.lock() = None; }

    /// Raw descriptor numbers that were resolved, in order.
    #[must_use]
    pub fn resolved(&self) -> Vec<i32> { self.resolved.lock().clone() }
}

impl DescriptorResolver for FakeDescriptors {
    fn resolve_descriptor_to_path(&self, fd: BorrowedFd<'_>) -> io::Result<PathBuf> {
        self.resolved.lock().push(fd.as_raw_fd());
        self.path
            .lock()
            .clone()
            .ok_or_else(|| io::Error::from_raw_os_error(9))
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Classifies paths from a fixed table.
#[derive(Debug, Default)]
pub struct FakeClassifier {
    classes: Mutex<HashMap<PathBuf, String>>,
    queried: Mutex<Vec<PathBuf>>,
}

impl FakeClassifier {
    pub fn set_class(&self, path: impl Into<PathBuf>, content_class: &str) {
        self.classes.lock().insert(path.into(), content_class.to_string());
    }

    /// Paths the pipeline asked about, in order.
    #[must_use]
    pub fn queried(&self) -> Vec<PathBuf> { self.queried.lock().clone() }
}

impl ContentClassifier for FakeClassifier {
    fn classify(&self, path: &Path) -> Option<String> {
        self.queried.lock().push(path.to_path_buf());
        self.classes.lock().get(path).cloned()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// An application registry keyed by content class.
#[derive(Debug, Default)]
pub struct FakeRegistry {
    handlers: Mutex<HashMap<String, Vec<HandlerCandidate>>>,
    queries: Mutex<Vec<String>>,
}

impl FakeRegistry {
    /// Registers a handler. The first one registered for a class is its default.
    pub fn register(&self, content_class: &str, id: &str, display_name: &str) {
        self.handlers
            .lock()
            .entry(content_class.to_string())
            .or_default()
            .push(HandlerCandidate::new(id, display_name));
    }

    /// Content classes looked up, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> { self.queries.lock().clone() }
}

impl AppRegistry for FakeRegistry {
    fn default_handler(&self, content_class: &str) -> Option<HandlerCandidate> {
        self.queries.lock().push(content_class.to_string());
        self.handlers.lock().get(content_class).and_then(|handlers| handlers.first().cloned())
    }

    fn all_handlers(&self, content_class: &str) -> Vec<HandlerCandidate> {
        self.queries.lock().push(content_class.to_string());
        self.handlers.lock().get(content_class).cloned().unwrap_or_default()
    }
}

// ============================================================================
// Launcher
// ============================================================================

/// How [`FakeLauncher`] answers launch requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LaunchBehavior {
    #[default]
    Succeed,
    /// Fail with a host message.
    Fail(String),
    /// Decline without a message.
    Refuse,
}

/// A launch the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLaunch {
    pub handler: HandlerCandidate,
    pub uris: Vec<String>,
    pub context: LaunchContext,
}

/// Records launches and answers per the scripted behavior.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    behavior: Mutex<LaunchBehavior>,
    launches: Mutex<Vec<RecordedLaunch>>,
}

impl FakeLauncher {
    pub fn set_behavior(&self, behavior: LaunchBehavior) { *self.behavior.lock() = behavior; }

    /// Every launch attempt, successful or not.
    #[must_use]
    pub fn launches(&self) -> Vec<RecordedLaunch> { self.launches.lock().clone() }
}

impl AppLauncher for FakeLauncher {
    fn launch(
        &self,
        handler: &HandlerCandidate,
        uris: &[String],
        context: &LaunchContext,
    ) -> Result<(), HostLaunchError> {
        self.launches.lock().push(RecordedLaunch {
            handler: handler.clone(),
            uris: uris.to_vec(),
            context: context.clone(),
        });

        match &*self.behavior.lock() {
            LaunchBehavior::Succeed => Ok(()),
            LaunchBehavior::Fail(message) => Err(HostLaunchError::Failed(message.clone())),
            LaunchBehavior::Refuse => Err(HostLaunchError::Refused),
        }
    }
}

// ============================================================================
// Notifiers
// ============================================================================

/// Stores every notification it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    closed: Mutex<bool>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> { self.sent.lock().clone() }

    #[must_use]
    pub fn is_closed(&self) -> bool { *self.closed.lock() }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<u32, NotifyError> {
        let mut sent = self.sent.lock();
        sent.push(notification.clone());
        Ok(u32::try_from(sent.len()).unwrap_or(u32::MAX))
    }

    async fn close(&self) { *self.closed.lock() = true; }
}

/// Rejects every notification.
#[derive(Debug, Default)]
pub struct FailingNotifier {
    attempts: Mutex<usize>,
}

impl FailingNotifier {
    #[must_use]
    pub fn attempts(&self) -> usize { *self.attempts.lock() }
}

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &Notification) -> Result<u32, NotifyError> {
        *self.attempts.lock() += 1;
        Err(NotifyError::Delivery("org.freedesktop.DBus.Error.ServiceUnknown".to_string()))
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A dispatcher wired to fresh fakes.
///
/// Notifications go to an in-process channel readable with
/// [`PortalHarness::notifications`].
pub struct PortalHarness {
    pub descriptors: Arc<FakeDescriptors>,
    pub classifier: Arc<FakeClassifier>,
    pub registry: Arc<FakeRegistry>,
    pub launcher: Arc<FakeLauncher>,
    dispatcher: PortalDispatcher,
    notifications: Mutex<UnboundedReceiver<Notification>>,
}

impl PortalHarness {
    /// A harness using the first-candidate chooser policy.
    #[must_use]
    pub fn new() -> Self { Self::with_policy(Box::new(FirstCandidate)) }

    #[must_use]
    pub fn with_policy(policy: Box<dyn ChoicePolicy>) -> Self {
        let descriptors = Arc::new(FakeDescriptors::default());
        let classifier = Arc::new(FakeClassifier::default());
        let registry = Arc::new(FakeRegistry::default());
        let launcher = Arc::new(FakeLauncher::default());

        let host = HostServices {
            descriptors: descriptors.clone(),
            classifier: classifier.clone(),
            registry: registry.clone(),
            launcher: launcher.clone(),
        };
        let (emitter, receiver) = NotificationEmitter::channel("XDG Portal");

        Self {
            descriptors,
            classifier,
            registry,
            launcher,
            dispatcher: PortalDispatcher::new(host, policy, emitter),
            notifications: Mutex::new(receiver),
        }
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &PortalDispatcher { &self.dispatcher }

    /// A typical request prefix.
    #[must_use]
    pub fn call(&self) -> CallContext {
        CallContext::new("/org/freedesktop/portal/desktop/request/1_42/t1", "org.example.Reader", "x11:2a")
    }

    /// Drains the notifications emitted so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        let mut receiver = self.notifications.lock();
        std::iter::from_fn(|| receiver.try_recv().ok()).collect()
    }
}

impl Default for PortalHarness {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for PortalHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalHarness").finish_non_exhaustive()
    }
}
