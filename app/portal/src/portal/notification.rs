//! Fire-and-forget launch notifications.
//!
//! [`NotificationEmitter::notify`] only enqueues. A background task owns the
//! host [`Notifier`] and delivers in order; delivery failures are logged and
//! dropped, so a reply is never held up or changed by the notification path.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::host::Notifier;

/// A desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub app_name: String,
    pub summary: String,
    pub body: String,
}

impl Notification {
    /// The "opened with" notification sent after a successful launch.
    #[must_use]
    pub fn launched(app_name: &str, handler_name: &str, target_label: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            summary: format!("Opened with {handler_name}"),
            body: format!("Target: {target_label}"),
        }
    }
}

/// Notification channel failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The notification service could not be reached.
    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    /// The service rejected or failed to deliver a notification.
    #[error("failed to deliver notification: {0}")]
    Delivery(String),
}

/// Handle used by the pipeline to emit notifications.
#[derive(Debug, Clone)]
pub struct NotificationEmitter {
    sender: Option<UnboundedSender<Notification>>,
    app_name: Arc<str>,
}

impl NotificationEmitter {
    /// An emitter that drops every notification.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sender: None, app_name: Arc::from("") }
    }

    /// An emitter feeding a caller-owned receiver.
    #[must_use]
    pub fn channel(app_name: &str) -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender: Some(sender), app_name: Arc::from(app_name) }, receiver)
    }

    /// An emitter delivering through `notifier` on a background task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(notifier: Arc<dyn Notifier>, app_name: &str) -> (Self, NotificationWorker) {
        let (emitter, mut receiver) = Self::channel(app_name);
        let delivery = Arc::clone(&notifier);

        let task = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                match delivery.send(&notification).await {
                    Ok(id) => tracing::debug!("notification sent with id {id}"),
                    Err(err) => tracing::warn!("{err}"),
                }
            }
        });

        (emitter, NotificationWorker { task, notifier })
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.sender.is_some() }

    /// Queues the "opened with" notification. Never blocks, never fails.
    pub fn notify(&self, handler_name: &str, target_label: &str) {
        let Some(sender) = &self.sender else {
            return;
        };

        let notification = Notification::launched(&self.app_name, handler_name, target_label);
        if sender.send(notification).is_err() {
            tracing::debug!("notification worker is gone, dropping notification");
        }
    }
}

/// The background delivery task.
pub struct NotificationWorker {
    task: JoinHandle<()>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationWorker {
    /// Stops delivery and closes the channel. Queued notifications are abandoned.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
        self.notifier.close().await;
    }
}

impl std::fmt::Debug for NotificationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationWorker").finish_non_exhaustive()
    }
}
