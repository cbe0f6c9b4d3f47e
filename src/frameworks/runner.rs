// Bootstrap for the command-line runner: config, tracing, session seeding and
// one read call against the named operation.

use crate::domain::envelope::RawEnvelope;
use crate::domain::errors::{BindingError, ClientBuildError};
use crate::domain::navigation::{Navigation, Outcome};
use crate::domain::operations::Operation;
use crate::domain::payload::Payload;
use crate::domain::ports::{Clock, Navigator, SessionStore, Transport};
use crate::domain::session::Lifetime;
use crate::frameworks::config::{self, ClientSettings, LogFormat};
use crate::interface_adapters::clients::{FixtureRegistry, HttpTransport};
use crate::interface_adapters::cookie_jar::CookieJar;
use crate::interface_adapters::navigator::ChannelNavigator;
use crate::use_cases::{EndpointBinding, PrescriptionApi};

use serde_json::{Value, json};
use std::{io::Result, sync::Arc};
use time::OffsetDateTime;

const USAGE: &str = "usage: prescription_client <operation> [json-payload]";

// Wall clock for the real session store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

// Loads `.env`, installs the subscriber picked by `LOG_FORMAT` and routes panics
// into the log.
fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let installed = match config::log_format() {
        LogFormat::Json => subscriber.json().with_current_span(true).try_init(),
        LogFormat::Compact => subscriber.compact().try_init(),
    };
    if let Err(err) = installed {
        tracing::debug!(error = %err, "keeping the existing subscriber");
    }

    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%location, payload = %info, %backtrace, "client panicked");
    }));
}

// Wire one binding per operation, all sharing the session store and navigator.
pub fn build_api(
    settings: &ClientSettings,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
) -> std::result::Result<PrescriptionApi, ClientBuildError> {
    let http = if settings.fixture_mode {
        None
    } else {
        Some(Arc::new(HttpTransport::new(
            settings.base_url.clone(),
            settings.timeout,
        )?))
    };
    let registry = FixtureRegistry::standard();

    let mut api = PrescriptionApi::new();
    for operation in Operation::ALL {
        let transport: Arc<dyn Transport> = match &http {
            Some(http) => Arc::clone(http) as Arc<dyn Transport>,
            None => match registry.transport_for(
                operation,
                Arc::clone(&session),
                settings.fixture_latency,
            ) {
                Some(fixture) => Arc::new(fixture) as Arc<dyn Transport>,
                None => {
                    tracing::warn!(%operation, "no fixture registered, operation left unbound");
                    continue;
                }
            },
        };
        api = api.with_binding(
            operation,
            EndpointBinding::new(
                operation.config(),
                transport,
                Arc::clone(&session),
                Arc::clone(&navigator),
            ),
        );
    }

    tracing::debug!(
        fixture_mode = settings.fixture_mode,
        base_url = %settings.base_url,
        timeout_ms = settings.timeout.as_millis(),
        "api bindings configured"
    );
    Ok(api)
}

// Invoke the read verb of `operation` and render the result as JSON.
pub async fn execute(
    api: &PrescriptionApi,
    operation: &str,
    payload: Option<&str>,
) -> std::result::Result<Value, BindingError> {
    let payload = parse_payload(payload)?;
    let outcome = api.binding_by_name(operation)?.read(Some(payload)).await?;
    Ok(render_outcome(outcome))
}

fn parse_payload(raw: Option<&str>) -> std::result::Result<Payload, BindingError> {
    let Some(raw) = raw else {
        return Ok(Payload::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Payload::new()),
        Ok(other) => Err(BindingError::InvalidPayload(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(BindingError::InvalidPayload(err.to_string())),
    }
}

pub fn render_outcome(outcome: Outcome<RawEnvelope>) -> Value {
    match outcome {
        Outcome::Proceed(envelope) => serde_json::to_value(envelope)
            .unwrap_or_else(|err| json!({ "render_error": err.to_string() })),
        Outcome::Redirected(navigation) => render_navigation(&navigation),
    }
}

fn render_navigation(navigation: &Navigation) -> Value {
    match navigation {
        Navigation::ErrorPage(context) => json!({
            "navigate": navigation.route_name(),
            "code": context.code,
        }),
        Navigation::Logout { url } => json!({
            "navigate": "logout",
            "url": url,
        }),
    }
}

pub async fn run(args: Vec<String>, settings: ClientSettings, seed_cookies: &str) -> Result<()> {
    let mut args = args.into_iter();
    let Some(operation) = args.next() else {
        return Err(std::io::Error::other(USAGE));
    };
    let payload = args.next();

    let jar = Arc::new(CookieJar::new(SystemClock));
    jar.seed_from_header(seed_cookies, Lifetime::Long);
    let (navigator, mut navigations) = ChannelNavigator::channel();

    let api = build_api(&settings, jar.clone(), Arc::new(navigator))
        .map_err(|e| std::io::Error::other(format!("failed to initialize api client: {e}")))?;

    let rendered = execute(&api, &operation, payload.as_deref())
        .await
        .inspect_err(|e| tracing::error!(%operation, error = %e, "call rejected"))
        .map_err(std::io::Error::other)?;

    while let Ok(navigation) = navigations.try_recv() {
        tracing::info!(?navigation, "view redirected");
    }
    tracing::debug!(
        attributes = ?jar.keys(),
        removed = jar.take_removal_lines().len(),
        "session after call"
    );

    let text = serde_json::to_string_pretty(&rendered).map_err(std::io::Error::other)?;
    println!("{text}");
    Ok(())
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = ClientSettings::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    run(args, settings, &config::session_cookies()).await
}
