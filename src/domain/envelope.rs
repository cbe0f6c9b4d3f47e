use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// Status token carried by every response envelope.
// Positive values come from the API; negative values are synthesized locally
// when the exchange itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    Found,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    InternalServerError,
    ServiceUnavailable,
    // -1: the request was aborted by the client-side timeout.
    Timeout,
    // -2: any failure that is neither a timeout nor a connectivity loss.
    Unknown,
    // -3: the network was unreachable.
    Network,
    // Anything the API sends outside the known set; always passed through.
    Other(String),
}

// How the endpoint binding reacts to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    // Redirect to the system error view.
    HardError,
    // Clear the session and leave through the logout URL.
    SessionExpired,
    // Hand the envelope back to the caller untouched.
    PassThrough,
}

impl ErrorCode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "200" => ErrorCode::Ok,
            "302" => ErrorCode::Found,
            "400" => ErrorCode::BadRequest,
            "401" => ErrorCode::Unauthorized,
            "403" => ErrorCode::Forbidden,
            "404" => ErrorCode::NotFound,
            "409" => ErrorCode::Conflict,
            "500" => ErrorCode::InternalServerError,
            "503" => ErrorCode::ServiceUnavailable,
            "-1" => ErrorCode::Timeout,
            "-2" => ErrorCode::Unknown,
            "-3" => ErrorCode::Network,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::Ok => "200",
            ErrorCode::Found => "302",
            ErrorCode::BadRequest => "400",
            ErrorCode::Unauthorized => "401",
            ErrorCode::Forbidden => "403",
            ErrorCode::NotFound => "404",
            ErrorCode::Conflict => "409",
            ErrorCode::InternalServerError => "500",
            ErrorCode::ServiceUnavailable => "503",
            ErrorCode::Timeout => "-1",
            ErrorCode::Unknown => "-2",
            ErrorCode::Network => "-3",
            ErrorCode::Other(raw) => raw,
        }
    }

    // Fixed partition: exactly two lists redirect, everything else passes through.
    pub fn class(&self) -> ResponseClass {
        match self.as_str() {
            "400" | "403" | "500" => ResponseClass::HardError,
            "302" | "401" => ResponseClass::SessionExpired,
            _ => ResponseClass::PassThrough,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The API sends string tokens, but tolerate bare numbers as well.
        match Value::deserialize(deserializer)? {
            Value::String(raw) => Ok(ErrorCode::parse(&raw)),
            Value::Number(raw) => Ok(ErrorCode::parse(&raw.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "unexpected error code value: {other}"
            ))),
        }
    }
}

/// Uniform response wrapper.
///
/// The three status fields are always present, even when the exchange failed;
/// operation-specific fields live in `body` and fall back to their defaults on
/// error responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Map<String, Value>> {
    #[serde(rename = "nb_err_cod")]
    pub error_code: ErrorCode,
    #[serde(rename = "err_msg", default)]
    pub error_message: String,
    #[serde(rename = "err_level", default)]
    pub error_level: String,
    #[serde(flatten)]
    pub body: T,
}

// Envelope as it travels through the transport, before typed decoding.
pub type RawEnvelope = Envelope<Map<String, Value>>;

impl<T: Default> Envelope<T> {
    // Envelope with empty message fields and a default body.
    pub fn with_code(error_code: ErrorCode) -> Self {
        Self {
            error_code,
            error_message: String::new(),
            error_level: String::new(),
            body: T::default(),
        }
    }
}

impl<T> Envelope<T> {
    // True when the API answered 200 but still attached a business-level warning.
    pub fn has_warning(&self) -> bool {
        self.error_code == ErrorCode::Ok && !self.error_message.is_empty()
    }
}

impl RawEnvelope {
    // Decode the operation-specific fields into a typed body.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

impl<T: Serialize> Envelope<T> {
    // Flatten a typed envelope back into its transport form.
    pub fn into_raw(self) -> Result<RawEnvelope, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}
