//! `org.freedesktop.Notifications` client.

use std::collections::HashMap;

use zbus::zvariant::Value;

use super::traits::Notifier;
use crate::portal::{Notification, NotifyError};

/// Server-default expiration.
const EXPIRE_DEFAULT: i32 = -1;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sends notifications to the session's notification server.
#[derive(Debug, Clone)]
pub struct FreedesktopNotifier {
    proxy: NotificationsProxy<'static>,
}

impl FreedesktopNotifier {
    /// Creates the notification proxy on an existing connection.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Unavailable`] if the proxy cannot be created.
    pub async fn connect(connection: &zbus::Connection) -> Result<Self, NotifyError> {
        let proxy = NotificationsProxy::new(connection)
            .await
            .map_err(|err| NotifyError::Unavailable(err.to_string()))?;
        Ok(Self { proxy })
    }
}

#[async_trait::async_trait]
impl Notifier for FreedesktopNotifier {
    async fn send(&self, notification: &Notification) -> Result<u32, NotifyError> {
        self.proxy
            .notify(
                &notification.app_name,
                0,
                "",
                &notification.summary,
                &notification.body,
                &[],
                HashMap::new(),
                EXPIRE_DEFAULT,
            )
            .await
            .map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}
