// Shared fake portal API for the integration tests, started once per test binary.
use axum::{
    Json, Router,
    extract::RawQuery,
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{OnceLock, mpsc};
use std::time::Duration;

// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

// Bound once per test binary; every test shares the same fake API.
static FAKE_API: OnceLock<String> = OnceLock::new();

fn envelope(code: &str) -> Value {
    json!({ "nb_err_cod": code, "err_msg": "", "err_level": "" })
}

// Echoes what the client sent inside a 200 envelope.
async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut reply = envelope("200");
    reply["method"] = json!(method.as_str());
    reply["authorization"] = json!(header("authorization"));
    reply["xsrf"] = json!(header("x-xsrf-token"));
    reply["content_type"] = json!(header("content-type"));
    reply["cookie"] = json!(header("cookie"));
    reply["query"] = json!(query.unwrap_or_default());
    reply["body"] = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
    Json(reply)
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(envelope("200"))
}

async fn teapot() -> impl IntoResponse {
    StatusCode::IM_A_TEAPOT
}

async fn expired() -> Json<Value> {
    Json(envelope("401"))
}

async fn hard() -> Json<Value> {
    Json(envelope("500"))
}

async fn warning() -> Json<Value> {
    let mut reply = envelope("200");
    reply["err_msg"] = json!("partial result");
    reply["dcf_cod"] = json!(["1111111"]);
    Json(reply)
}

async fn malformed() -> impl IntoResponse {
    (StatusCode::OK, "this is not an envelope")
}

fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/slow", get(slow))
        .route("/teapot", get(teapot))
        .route("/expired", get(expired))
        .route("/hard", get(hard))
        .route("/warning", get(warning))
        .route("/malformed", get(malformed))
}

// Base URL of the fake API, starting it on first use.
pub fn ensure_server() -> &'static str {
    FAKE_API.get_or_init(start_fake_api).as_str()
}

// The server gets its own OS thread and runtime so it outlives each test's runtime.
// A bound listener already queues connections, so the address is usable as soon
// as it arrives.
fn start_fake_api() -> String {
    let (bound_tx, bound_rx) = mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind fake api");
            let addr = listener.local_addr().expect("fake api addr");
            bound_tx.send(addr).expect("test thread waiting for fake api");
            axum::serve(listener, app()).await.expect("fake api stopped");
        });
    });

    let addr = bound_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("fake api did not bind in time");
    format!("http://{addr}")
}

// A port nothing listens on: bind, remember, release.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind spare port");
    let addr = listener.local_addr().expect("spare port addr");
    drop(listener);
    format!("http://{addr}")
}
