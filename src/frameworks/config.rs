use std::{env, time::Duration};

use crate::interface_adapters::clients::fixtures::DEFAULT_FIXTURE_LATENCY;
use crate::interface_adapters::clients::http::DEFAULT_TIMEOUT;

// Runtime configuration, read from the environment (optionally via `.env`).

pub fn api_base_url() -> String {
    env::var("PRESCRIPTION_API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

pub fn api_timeout() -> Duration {
    millis_var("PRESCRIPTION_API_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT)
}

// Canned fixture transports instead of the network.
pub fn fixture_mode() -> bool {
    env::var("PRESCRIPTION_FIXTURE_MODE")
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

pub fn fixture_latency() -> Duration {
    millis_var("PRESCRIPTION_FIXTURE_LATENCY_MS").unwrap_or(DEFAULT_FIXTURE_LATENCY)
}

// Session attributes to start with, in `Cookie` header form.
pub fn session_cookies() -> String {
    env::var("PRESCRIPTION_SESSION_COOKIES").unwrap_or_default()
}

// Output layout of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

pub fn log_format() -> LogFormat {
    env::var("LOG_FORMAT")
        .map(|value| LogFormat::parse(&value))
        .unwrap_or_default()
}

fn millis_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub fixture_mode: bool,
    pub fixture_latency: Duration,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: api_base_url(),
            timeout: api_timeout(),
            fixture_mode: fixture_mode(),
            fixture_latency: fixture_latency(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: DEFAULT_TIMEOUT,
            fixture_mode: false,
            fixture_latency: DEFAULT_FIXTURE_LATENCY,
        }
    }
}
