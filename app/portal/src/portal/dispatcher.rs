//! Portal request dispatcher.
//!
//! One method per bus operation. Each request walks a fixed sequence of
//! stages and ends in exactly one reply:
//!
//! ```text
//! Received -> Resolving -> HandlerLookup -> [Choosing] -> Launching -> Notifying -> Replied
//! ```
//!
//! Any component error jumps straight to a failure reply; the log line names
//! the stage the request stopped in. Notifying never fails a request.
//!
//! The dispatcher holds no mutable state. Concurrent requests share it
//! through an `Arc` and never observe each other.

use std::fmt;
use std::os::fd::{AsRawFd, BorrowedFd};

use serde_json::Value;

use super::chooser::{ChoicePolicy, ChoiceRequest, ChoiceResolver};
use super::descriptor::{ResourceInput, ResourceResolver};
use super::error::PortalError;
use super::handlers::HandlerDirectory;
use super::launcher::{LaunchContext, LaunchExecutor};
use super::notification::NotificationEmitter;
use super::reply::{Options, ReplyEnvelope};
use crate::core::constants::SUPPORTED_SCHEMES;
use crate::host::HostServices;

/// Portal option carrying the window-activation token.
pub const ACTIVATION_TOKEN_OPTION: &str = "activation_token";

/// Result key of a successful `ChooseApplication`.
pub const CHOICE_RESULT: &str = "choice";

/// Common leading arguments of request-style portal calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Request object path.
    pub handle: String,
    /// App id of the caller.
    pub app_id: String,
    /// Window identifier for dialog parenting.
    pub parent_window: String,
}

impl CallContext {
    pub fn new(handle: impl Into<String>, app_id: impl Into<String>, parent_window: impl Into<String>) -> Self {
        Self { handle: handle.into(), app_id: app_id.into(), parent_window: parent_window.into() }
    }
}

/// Pipeline stage of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Resolving,
    HandlerLookup,
    Choosing,
    Launching,
    Notifying,
    Replied,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Resolving => "resolving",
            Self::HandlerLookup => "handler lookup",
            Self::Choosing => "choosing",
            Self::Launching => "launching",
            Self::Notifying => "notifying",
            Self::Replied => "replied",
        };
        f.write_str(name)
    }
}

/// Routes portal calls through the resolution pipeline.
#[derive(Debug)]
pub struct PortalDispatcher {
    resolver: ResourceResolver,
    handlers: HandlerDirectory,
    chooser: ChoiceResolver,
    executor: LaunchExecutor,
    notifications: NotificationEmitter,
}

impl PortalDispatcher {
    /// Builds a dispatcher from its collaborators.
    #[must_use]
    pub fn new(host: HostServices, policy: Box<dyn ChoicePolicy>, notifications: NotificationEmitter) -> Self {
        Self {
            resolver: ResourceResolver::new(host.descriptors, host.classifier),
            handlers: HandlerDirectory::new(host.registry),
            chooser: ChoiceResolver::new(policy),
            executor: LaunchExecutor::new(host.launcher),
            notifications,
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> &ResourceResolver { &self.resolver }

    #[must_use]
    pub const fn handlers(&self) -> &HandlerDirectory { &self.handlers }

    /// `AppChooser.ChooseApplication`.
    #[must_use]
    pub fn choose_application(&self, request: &ChoiceRequest) -> ReplyEnvelope {
        tracing::info!(
            "ChooseApplication: handle={} app_id={} parent_window={} choices={:?} options={}",
            request.handle,
            request.requester_app,
            request.presentation_handle,
            request.candidates,
            options_json(&request.options)
        );

        match self.chooser.choose(request) {
            Ok(choice) => {
                tracing::info!("ChooseApplication: returning choice {choice}");
                let mut results = Options::new();
                results.insert(CHOICE_RESULT.to_string(), Value::String(choice));
                ReplyEnvelope::success_with(results)
            }
            Err(err) => fail("ChooseApplication", Stage::Choosing, &err),
        }
    }

    /// `AppChooser.UpdateChoices`.
    pub fn update_choices(&self, handle: &str, choices: &[String]) {
        tracing::info!("UpdateChoices: handle={handle} choices={choices:?}");
        self.chooser.update_choices(handle, choices);
    }

    /// `OpenURI.OpenURI`.
    #[must_use]
    pub fn open_uri(&self, call: &CallContext, uri: &str, options: &Options) -> ReplyEnvelope {
        tracing::info!(
            "OpenURI: handle={} app_id={} parent_window={} uri={uri} options={}",
            call.handle,
            call.app_id,
            call.parent_window,
            options_json(options)
        );
        self.open("OpenURI", call, ResourceInput::Uri(uri), options)
    }

    /// `OpenURI.OpenFile`.
    #[must_use]
    pub fn open_file(&self, call: &CallContext, fd: BorrowedFd<'_>, options: &Options) -> ReplyEnvelope {
        tracing::info!(
            "OpenFile: handle={} app_id={} parent_window={} fd={} options={}",
            call.handle,
            call.app_id,
            call.parent_window,
            fd.as_raw_fd(),
            options_json(options)
        );
        self.open("OpenFile", call, ResourceInput::File(fd), options)
    }

    /// `OpenURI.OpenDirectory`.
    #[must_use]
    pub fn open_directory(&self, call: &CallContext, fd: BorrowedFd<'_>, options: &Options) -> ReplyEnvelope {
        tracing::info!(
            "OpenDirectory: handle={} app_id={} parent_window={} fd={} options={}",
            call.handle,
            call.app_id,
            call.parent_window,
            fd.as_raw_fd(),
            options_json(options)
        );
        self.open("OpenDirectory", call, ResourceInput::Directory(fd), options)
    }

    /// `OpenURI.SchemeSupported`. Pure allow-list check.
    #[must_use]
    pub fn scheme_supported(&self, scheme: &str, options: &Options) -> bool {
        tracing::info!("SchemeSupported: scheme={scheme} options={}", options_json(options));
        let supported = is_supported_scheme(scheme);
        tracing::info!("SchemeSupported: {scheme} supported: {supported}");
        supported
    }

    fn open(&self, operation: &str, call: &CallContext, input: ResourceInput<'_>, options: &Options) -> ReplyEnvelope {
        let mut stage = Stage::Received;
        match self.run_open(&mut stage, call, input, options) {
            Ok(()) => ReplyEnvelope::success(),
            Err(err) => fail(operation, stage, &err),
        }
    }

    fn run_open(
        &self,
        stage: &mut Stage,
        call: &CallContext,
        input: ResourceInput<'_>,
        options: &Options,
    ) -> Result<(), PortalError> {
        *stage = Stage::Resolving;
        let descriptor = self.resolver.resolve(input)?;
        tracing::debug!(
            "{}: content type {}",
            descriptor.raw.to_string_lossy(),
            descriptor.content_class
        );

        *stage = Stage::HandlerLookup;
        let handler = match input {
            ResourceInput::Directory(_) => self.handlers.directory_handler()?,
            ResourceInput::Uri(_) | ResourceInput::File(_) => {
                self.handlers.default_handler_for(&descriptor.content_class)?
            }
        };

        *stage = Stage::Launching;
        let context = LaunchContext {
            requester_app: call.app_id.clone(),
            activation_token: activation_token(options),
        };
        let outcome = self.executor.launch(&handler, &descriptor, &context).into_result()?;

        *stage = Stage::Notifying;
        let handler_name = outcome.handler_display_name.as_deref().unwrap_or(&handler.display_name);
        self.notifications.notify(handler_name, &descriptor.label());

        *stage = Stage::Replied;
        tracing::info!("opened {} with {}", descriptor.raw.to_string_lossy(), handler.id);
        Ok(())
    }
}

fn fail(operation: &str, stage: Stage, err: &PortalError) -> ReplyEnvelope {
    tracing::warn!("{operation} failed during {stage}: {err}");
    ReplyEnvelope::failure()
}

/// Returns whether `scheme` is on the allow-list, ignoring ASCII case.
#[must_use]
pub fn is_supported_scheme(scheme: &str) -> bool {
    SUPPORTED_SCHEMES.iter().any(|supported| supported.eq_ignore_ascii_case(scheme))
}

fn activation_token(options: &Options) -> Option<String> {
    options
        .get(ACTIVATION_TOKEN_OPTION)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn options_json(options: &Options) -> String {
    serde_json::to_string(options).unwrap_or_else(|_| format!("{options:?}"))
}
