use crate::domain::exchange::Verb;
use std::fmt;

// Misuse of an endpoint binding. Network and API failures never show up here;
// they travel inside the envelope.
#[derive(Debug)]
pub enum BindingError {
    UnsupportedVerb {
        operation: &'static str,
        verb: Verb,
    },
    UnknownOperation(String),
    InvalidPayload(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::UnsupportedVerb { operation, verb } => {
                write!(f, "operation {operation} has no {verb} endpoint")
            }
            BindingError::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
            BindingError::InvalidPayload(reason) => write!(f, "invalid request payload: {reason}"),
        }
    }
}

impl std::error::Error for BindingError {}

// Failure while wiring the client together at startup.
#[derive(Debug)]
pub enum ClientBuildError {
    InvalidBaseUrl(String),
    Http(reqwest::Error),
}

impl fmt::Display for ClientBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientBuildError::InvalidBaseUrl(url) => write!(f, "invalid api base url: {url}"),
            ClientBuildError::Http(err) => write!(f, "failed to build http client: {err}"),
        }
    }
}

impl std::error::Error for ClientBuildError {}

impl From<reqwest::Error> for ClientBuildError {
    fn from(err: reqwest::Error) -> Self {
        ClientBuildError::Http(err)
    }
}
