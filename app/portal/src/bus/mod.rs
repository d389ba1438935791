//! Session bus surface of the portal backend.
//!
//! Startup order: connect, export both interfaces, then claim the well-known
//! name without queueing. The name is only requested once both objects exist.

pub mod app_chooser;
pub mod open_uri;
pub mod variant;

use std::sync::Arc;

use zbus::Connection;
use zbus::fdo::{RequestNameFlags, RequestNameReply};

pub use app_chooser::AppChooserInterface;
pub use open_uri::OpenUriInterface;

use crate::config::PortalConfig;
use crate::core::constants::interfaces;
use crate::core::prelude::*;
use crate::host::HostServices;
use crate::host::notifications::FreedesktopNotifier;
use crate::portal::{NotificationEmitter, NotificationWorker, PortalDispatcher, ReplyEnvelope, policy_for};

/// Runs the portal backend until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the bus connection, an interface export or the name
/// request fails, or if the signal handlers cannot be installed.
pub async fn serve(config: &PortalConfig) -> Result<()> {
    let connection =
        Connection::session().await.map_err(|err| Error::bus_connect(err.to_string()))?;

    let (notifications, worker) = notification_emitter(&connection, config).await;
    let dispatcher = Arc::new(PortalDispatcher::new(
        HostServices::xdg(config),
        policy_for(config.chooser.policy),
        notifications,
    ));

    export(&connection, &dispatcher).await?;
    request_name(&connection).await?;
    tracing::info!("{BUS_NAME} ready at {OBJECT_PATH}");

    wait_for_shutdown().await?;
    tracing::info!("shutting down");

    if let Some(worker) = worker {
        worker.shutdown().await;
    }

    Ok(())
}

/// Exports both portal interfaces at [`OBJECT_PATH`].
///
/// # Errors
///
/// Returns [`Error::Export`] naming the interface that could not be exported.
pub async fn export(connection: &Connection, dispatcher: &Arc<PortalDispatcher>) -> Result<()> {
    let server = connection.object_server();

    let added = server
        .at(OBJECT_PATH, AppChooserInterface::new(Arc::clone(dispatcher)))
        .await
        .map_err(|err| Error::export(interfaces::APP_CHOOSER, err.to_string()))?;
    if !added {
        return Err(Error::export(interfaces::APP_CHOOSER, "already exported"));
    }

    let added = server
        .at(OBJECT_PATH, OpenUriInterface::new(Arc::clone(dispatcher)))
        .await
        .map_err(|err| Error::export(interfaces::OPEN_URI, err.to_string()))?;
    if !added {
        return Err(Error::export(interfaces::OPEN_URI, "already exported"));
    }

    Ok(())
}

async fn request_name(connection: &Connection) -> Result<()> {
    match connection.request_name_with_flags(BUS_NAME, RequestNameFlags::DoNotQueue.into()).await {
        Ok(RequestNameReply::PrimaryOwner | RequestNameReply::AlreadyOwner) => Ok(()),
        Ok(RequestNameReply::Exists | RequestNameReply::InQueue) | Err(zbus::Error::NameTaken) => {
            Err(Error::NameTaken(BUS_NAME.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

async fn notification_emitter(
    connection: &Connection,
    config: &PortalConfig,
) -> (NotificationEmitter, Option<NotificationWorker>) {
    if !config.notifications.enabled {
        tracing::info!("notifications disabled in configuration");
        return (NotificationEmitter::disabled(), None);
    }

    match FreedesktopNotifier::connect(connection).await {
        Ok(notifier) => {
            let (emitter, worker) =
                NotificationEmitter::spawn(Arc::new(notifier), &config.notifications.app_name);
            (emitter, Some(worker))
        }
        Err(err) => {
            tracing::warn!("{err}, notifications disabled");
            (NotificationEmitter::disabled(), None)
        }
    }
}

async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }

    Ok(())
}

/// Runs a dispatcher call on the blocking pool.
///
/// A panicked or cancelled worker becomes a failure reply.
pub(crate) async fn run_blocking<F>(operation: &'static str, call: F) -> ReplyEnvelope
where
    F: FnOnce() -> ReplyEnvelope + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!("{operation} worker failed: {err}");
            ReplyEnvelope::failure()
        }
    }
}
