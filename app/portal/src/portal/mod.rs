//! The portal request pipeline.
//!
//! Components, leaf first:
//!
//! - [`descriptor`] - classifies URIs and transferred descriptors
//! - [`handlers`] - default handler lookup
//! - [`launcher`] - starts the handler once
//! - [`chooser`] - decides `ChooseApplication` calls
//! - [`notification`] - best-effort launch notifications
//! - [`dispatcher`] - one entry point per bus operation
//!
//! Nothing in this module knows about D-Bus; the bus layer converts wire
//! types to the plain Rust types used here.

pub mod chooser;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod launcher;
pub mod notification;
pub mod reply;

pub use chooser::{ChoicePolicy, ChoiceRequest, ChoiceResolver, FirstCandidate, LastChoice, policy_for};
pub use descriptor::{ResourceDescriptor, ResourceInput, ResourceKind, ResourceResolver};
pub use dispatcher::{CallContext, PortalDispatcher, Stage};
pub use error::PortalError;
pub use handlers::{HandlerCandidate, HandlerDirectory};
pub use launcher::{LaunchContext, LaunchExecutor, LaunchOutcome};
pub use notification::{Notification, NotificationEmitter, NotificationWorker, NotifyError};
pub use reply::{Options, ReplyEnvelope, ResponseCode};
