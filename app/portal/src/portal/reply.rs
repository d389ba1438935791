//! The two-part reply every request-style portal method returns.

use std::collections::BTreeMap;

use serde::Serialize;

/// Auxiliary key/value data attached to requests and replies.
///
/// The bus layer converts `a{sv}` maps to and from this representation.
pub type Options = BTreeMap<String, serde_json::Value>;

/// Numeric response code of a portal reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum ResponseCode {
    Success = 0,
    Failure = 1,
}

impl ResponseCode {
    #[must_use]
    pub const fn as_u32(self) -> u32 { self as u32 }
}

/// Response code plus result map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyEnvelope {
    pub response: ResponseCode,
    pub results: Options,
}

impl ReplyEnvelope {
    /// A success reply with empty results.
    #[must_use]
    pub const fn success() -> Self {
        Self { response: ResponseCode::Success, results: Options::new() }
    }

    /// A success reply carrying `results`.
    #[must_use]
    pub const fn success_with(results: Options) -> Self {
        Self { response: ResponseCode::Success, results }
    }

    /// A failure reply. Results are always empty.
    #[must_use]
    pub const fn failure() -> Self {
        Self { response: ResponseCode::Failure, results: Options::new() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool { self.response == ResponseCode::Success }
}
