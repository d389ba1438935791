//! `org.freedesktop.impl.portal.OpenURI` bus object.
//!
//! Received descriptors are moved into the blocking worker and closed when
//! the request completes.

use std::os::fd::AsFd;
use std::sync::Arc;

use zbus::zvariant::{OwnedFd, OwnedObjectPath};

use super::run_blocking;
use super::variant::{WireOptions, options_from_wire, results_to_wire};
use crate::portal::{CallContext, PortalDispatcher, ReplyEnvelope};

/// Exports the open-resource half of the dispatcher.
#[derive(Debug, Clone)]
pub struct OpenUriInterface {
    dispatcher: Arc<PortalDispatcher>,
}

impl OpenUriInterface {
    #[must_use]
    pub const fn new(dispatcher: Arc<PortalDispatcher>) -> Self { Self { dispatcher } }
}

fn wire_reply(reply: &ReplyEnvelope) -> (u32, WireOptions) {
    (reply.response.as_u32(), results_to_wire(&reply.results))
}

#[zbus::interface(name = "org.freedesktop.impl.portal.OpenURI")]
impl OpenUriInterface {
    #[zbus(name = "OpenURI")]
    #[zbus(out_args("response", "results"))]
    async fn open_uri(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        uri: String,
        options: WireOptions,
    ) -> (u32, WireOptions) {
        let call = CallContext::new(handle.as_str(), app_id, parent_window);
        let options = options_from_wire(&options);

        let dispatcher = Arc::clone(&self.dispatcher);
        let reply = run_blocking("OpenURI", move || dispatcher.open_uri(&call, &uri, &options)).await;
        wire_reply(&reply)
    }

    #[zbus(out_args("response", "results"))]
    async fn open_file(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        fd: OwnedFd,
        options: WireOptions,
    ) -> (u32, WireOptions) {
        let call = CallContext::new(handle.as_str(), app_id, parent_window);
        let options = options_from_wire(&options);

        let dispatcher = Arc::clone(&self.dispatcher);
        let reply =
            run_blocking("OpenFile", move || dispatcher.open_file(&call, fd.as_fd(), &options)).await;
        wire_reply(&reply)
    }

    #[zbus(out_args("response", "results"))]
    async fn open_directory(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        fd: OwnedFd,
        options: WireOptions,
    ) -> (u32, WireOptions) {
        let call = CallContext::new(handle.as_str(), app_id, parent_window);
        let options = options_from_wire(&options);

        let dispatcher = Arc::clone(&self.dispatcher);
        let reply =
            run_blocking("OpenDirectory", move || dispatcher.open_directory(&call, fd.as_fd(), &options))
                .await;
        wire_reply(&reply)
    }

    async fn scheme_supported(&self, scheme: String, options: WireOptions) -> bool {
        self.dispatcher.scheme_supported(&scheme, &options_from_wire(&options))
    }
}
