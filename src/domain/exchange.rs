use crate::domain::envelope::{ErrorCode, RawEnvelope};
use crate::domain::navigation::ErrorContext;
use crate::domain::payload::Payload;
use std::fmt;

// The four verbs every transport and binding exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Read,
    Create,
    Replace,
    Remove,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Read, Verb::Create, Verb::Replace, Verb::Remove];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Read => "read",
            Verb::Create => "create",
            Verb::Replace => "replace",
            Verb::Remove => "remove",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Credentials gathered for one call. Built fresh for every request and handed to
// the transport; nothing is stored on the shared client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub auth_token: String,
    pub xsrf_token: String,
    // Live session attributes rendered as a `Cookie` header.
    pub cookies: String,
}

// Token values stay out of logs.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("auth_token_present", &!self.auth_token.is_empty())
            .field("xsrf_token_present", &!self.xsrf_token.is_empty())
            .field("cookies_present", &!self.cookies.is_empty())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub verb: Verb,
    pub path: String,
    pub payload: Payload,
    pub context: RequestContext,
}

// What a transport hands back. The envelope is always present; `error_page` is
// set when the failure could not be classified and the error view must be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub envelope: RawEnvelope,
    pub error_page: Option<ErrorContext>,
}

impl Exchange {
    pub fn delivered(envelope: RawEnvelope) -> Self {
        Self {
            envelope,
            error_page: None,
        }
    }

    pub fn timed_out() -> Self {
        Self::delivered(RawEnvelope::with_code(ErrorCode::Timeout))
    }

    pub fn network_down() -> Self {
        Self::delivered(RawEnvelope::with_code(ErrorCode::Network))
    }

    // Unclassified failure; a missing status is reported as the sentinel.
    pub fn failed(status: Option<u16>) -> Self {
        Self {
            envelope: RawEnvelope::with_code(ErrorCode::Unknown),
            error_page: Some(ErrorContext::from_status(status)),
        }
    }
}
