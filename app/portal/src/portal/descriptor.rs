//! Resource descriptor resolution.
//!
//! Turns the target of an `OpenURI`, `OpenFile` or `OpenDirectory` call into
//! a [`ResourceDescriptor`]: what the target is, how to hand it to an
//! application, and which content class to look a handler up for.
//!
//! URIs are classified by scheme alone. Descriptors are dereferenced through
//! the host's [`DescriptorResolver`] and classified by the host's
//! [`ContentClassifier`]; directories skip classification entirely.

use std::ffi::OsString;
use std::os::fd::BorrowedFd;
use std::path::Path;
use std::sync::Arc;

use super::error::PortalError;
use crate::core::constants::content_class;
use crate::host::{ContentClassifier, DescriptorResolver};

/// What kind of target a descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A URI handed over verbatim.
    Uri,
    /// A local path recovered from a file or directory descriptor.
    LocalPath,
}

/// A classified request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    /// The URI or absolute path, byte for byte as received.
    pub raw: OsString,
    /// MIME type used for the handler lookup.
    pub content_class: String,
}

impl ResourceDescriptor {
    /// Returns the launch target.
    ///
    /// URIs are passed through; local paths become percent-encoded `file://` URIs.
    #[must_use]
    pub fn target(&self) -> String {
        match self.kind {
            ResourceKind::Uri => self.raw.to_string_lossy().into_owned(),
            ResourceKind::LocalPath => {
                let path = Path::new(&self.raw);
                url::Url::from_file_path(path)
                    .map_or_else(|()| format!("file://{}", path.display()), String::from)
            }
        }
    }

    /// Returns the short label shown in notifications.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            ResourceKind::Uri => self.raw.to_string_lossy().into_owned(),
            ResourceKind::LocalPath => Path::new(&self.raw)
                .file_name()
                .unwrap_or(self.raw.as_os_str())
                .to_string_lossy()
                .into_owned(),
        }
    }
}

/// Target of a request, before resolution.
#[derive(Debug, Clone, Copy)]
pub enum ResourceInput<'a> {
    Uri(&'a str),
    File(BorrowedFd<'a>),
    Directory(BorrowedFd<'a>),
}

/// Resolves request targets into descriptors.
#[derive(Clone)]
pub struct ResourceResolver {
    descriptors: Arc<dyn DescriptorResolver>,
    classifier: Arc<dyn ContentClassifier>,
}

impl ResourceResolver {
    #[must_use]
    pub fn new(descriptors: Arc<dyn DescriptorResolver>, classifier: Arc<dyn ContentClassifier>) -> Self {
        Self { descriptors, classifier }
    }

    /// Resolves and classifies `input`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ResourceResolution`] when a descriptor cannot be
    /// dereferenced. URIs never fail.
    pub fn resolve(&self, input: ResourceInput<'_>) -> Result<ResourceDescriptor, PortalError> {
        match input {
            ResourceInput::Uri(uri) => Ok(ResourceDescriptor {
                kind: ResourceKind::Uri,
                raw: uri.into(),
                content_class: classify_uri(uri).to_string(),
            }),
            ResourceInput::File(fd) => {
                let path = self.path_of(fd)?;
                let content_class = self
                    .classifier
                    .classify(Path::new(&path))
                    .unwrap_or_else(|| content_class::OCTET_STREAM.to_string());
                Ok(ResourceDescriptor { kind: ResourceKind::LocalPath, raw: path, content_class })
            }
            ResourceInput::Directory(fd) => Ok(ResourceDescriptor {
                kind: ResourceKind::LocalPath,
                raw: self.path_of(fd)?,
                content_class: content_class::DIRECTORY.to_string(),
            }),
        }
    }

    fn path_of(&self, fd: BorrowedFd<'_>) -> Result<OsString, PortalError> {
        use std::os::fd::AsRawFd;

        let path = self.descriptors.resolve_descriptor_to_path(fd).map_err(|err| {
            PortalError::resolution(format!("failed to read file descriptor {}: {err}", fd.as_raw_fd()))
        })?;

        Ok(path.into_os_string())
    }
}

impl std::fmt::Debug for ResourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceResolver").finish_non_exhaustive()
    }
}

/// Returns the URI scheme, lower-cased, if `uri` starts with a valid one.
#[must_use]
pub fn uri_scheme(uri: &str) -> Option<String> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then(|| scheme.to_ascii_lowercase())
}

/// Maps a URI to its content class by scheme.
#[must_use]
pub fn classify_uri(uri: &str) -> &'static str {
    match uri_scheme(uri).as_deref() {
        Some("http" | "https") => content_class::HYPERTEXT,
        Some("mailto") => content_class::MESSAGE,
        _ => content_class::OCTET_STREAM,
    }
}
