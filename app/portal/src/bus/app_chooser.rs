//! `org.freedesktop.impl.portal.AppChooser` bus object.

use std::sync::Arc;

use zbus::zvariant::OwnedObjectPath;

use super::run_blocking;
use super::variant::{WireOptions, options_from_wire, results_to_wire};
use crate::portal::{ChoiceRequest, PortalDispatcher};

/// Exports the chooser half of the dispatcher.
#[derive(Debug, Clone)]
pub struct AppChooserInterface {
    dispatcher: Arc<PortalDispatcher>,
}

impl AppChooserInterface {
    #[must_use]
    pub const fn new(dispatcher: Arc<PortalDispatcher>) -> Self { Self { dispatcher } }
}

#[zbus::interface(name = "org.freedesktop.impl.portal.AppChooser")]
impl AppChooserInterface {
    #[zbus(out_args("response", "results"))]
    async fn choose_application(
        &self,
        handle: OwnedObjectPath,
        app_id: String,
        parent_window: String,
        choices: Vec<String>,
        options: WireOptions,
    ) -> (u32, WireOptions) {
        let request = ChoiceRequest {
            handle: handle.as_str().to_string(),
            requester_app: app_id,
            presentation_handle: parent_window,
            candidates: choices,
            options: options_from_wire(&options),
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let reply =
            run_blocking("ChooseApplication", move || dispatcher.choose_application(&request)).await;
        (reply.response.as_u32(), results_to_wire(&reply.results))
    }

    async fn update_choices(&self, handle: OwnedObjectPath, choices: Vec<String>) {
        self.dispatcher.update_choices(handle.as_str(), &choices);
    }
}
