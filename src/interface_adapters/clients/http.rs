use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::domain::envelope::RawEnvelope;
use crate::domain::errors::ClientBuildError;
use crate::domain::exchange::{Exchange, RequestContext, TransportRequest, Verb};
use crate::domain::payload::{Payload, strip_empty_fields};
use crate::domain::ports::Transport;

// Anti-forgery token header expected by the API.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

// Fixed timeout for every exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// Thin wrapper around reqwest for the portal API. Shared client, per-call headers.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientBuildError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|_| ClientBuildError::InvalidBaseUrl(base_url.clone()))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: &TransportRequest) -> Option<RequestBuilder> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path)).ok()?;
        let payload = strip_empty_fields(&request.payload);

        let context = &request.context;

        // Credentials go on before the body so `json()` keeps our content type.
        let builder = match request.verb {
            Verb::Read => {
                append_query(&mut url, &payload);
                with_credentials(self.http.get(url), context)
            }
            Verb::Remove => {
                append_query(&mut url, &payload);
                with_credentials(self.http.delete(url), context)
            }
            Verb::Create => with_credentials(self.http.post(url), context).json(&payload),
            Verb::Replace => with_credentials(self.http.put(url), context).json(&payload),
        };

        Some(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(
        name = "http_exchange",
        skip_all,
        fields(verb = %request.verb, path = %request.path)
    )]
    async fn exchange(&self, request: TransportRequest) -> Exchange {
        let Some(builder) = self.build(&request) else {
            tracing::error!(base_url = %self.base_url, "could not compose request url");
            return Exchange::failed(None);
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return classify_failure(&err),
        };

        let status = response.status();
        // Any non-2xx status is an unclassified failure; the status is shown on the error view.
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "api answered with failure status");
            return Exchange::failed(Some(status.as_u16()));
        }

        match response.json::<RawEnvelope>().await {
            Ok(envelope) => {
                tracing::debug!(error_code = %envelope.error_code, "api response received");
                Exchange::delivered(envelope)
            }
            Err(err) => classify_failure(&err),
        }
    }
}

// Map a reqwest failure onto the three transport codes.
fn classify_failure(err: &reqwest::Error) -> Exchange {
    if err.is_timeout() {
        tracing::warn!(error = %err, "request timed out");
        return Exchange::timed_out();
    }
    if err.is_connect() {
        tracing::warn!(error = %err, "network unreachable");
        return Exchange::network_down();
    }
    let status = err.status().map(|status| status.as_u16());
    tracing::error!(error = %err, ?status, "request failed");
    Exchange::failed(status)
}

// Credentials travel as headers on this request only; a missing token still
// produces the header with an empty value.
fn with_credentials(builder: RequestBuilder, context: &RequestContext) -> RequestBuilder {
    let builder = builder
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(AUTHORIZATION, format!("Bearer {}", context.auth_token))
        .header(XSRF_HEADER, context.xsrf_token.as_str());
    if context.cookies.is_empty() {
        builder
    } else {
        builder.header(COOKIE, context.cookies.as_str())
    }
}

// Scalars become one query pair each, arrays repeat the key, objects go as JSON text.
fn append_query(url: &mut Url, payload: &Payload) {
    if payload.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.append_pair(key, &query_value(item));
                }
            }
            other => {
                pairs.append_pair(key, &query_value(other));
            }
        }
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
