use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::exchange::{Exchange, TransportRequest};
use crate::domain::navigation::Navigation;
use crate::domain::session::Lifetime;

// Port for the network exchange. Implementations never fail: every failure is
// folded into the returned envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: TransportRequest) -> Exchange;
}

// Port for the cookie-backed session attributes.
pub trait SessionStore: Send + Sync {
    // Empty string when the attribute is absent or expired.
    fn get(&self, key: &str) -> String;
    fn set(&self, key: &str, value: &str, lifetime: Lifetime);
    // Names of every live attribute, known or not.
    fn keys(&self) -> Vec<String>;
    // Removes every attribute currently present.
    fn delete_all(&self);
    // Live attributes rendered as a `Cookie` request header.
    fn cookie_header(&self) -> String;
}

// Port for redirecting the active view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: &Navigation);
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}
