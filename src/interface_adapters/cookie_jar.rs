use cookie::{Cookie, SameSite};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::{Duration, OffsetDateTime};

use crate::domain::ports::{Clock, SessionStore};
use crate::domain::session::Lifetime;

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: OffsetDateTime,
}

// In-memory cookie jar backing the session store. Every attribute carries its own
// absolute expiry; expired attributes read as absent.
pub struct CookieJar<C> {
    clock: C,
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
    // Removal lines produced by `delete_all`, waiting for the response writer.
    removals: Mutex<Vec<String>>,
}

impl<C: Clock> CookieJar<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            cookies: Mutex::new(BTreeMap::new()),
            removals: Mutex::new(Vec::new()),
        }
    }

    // Load attributes from a `Cookie` header style string (`a=1; b=2`).
    // Values keep any `=` after the first one; malformed pairs are skipped.
    pub fn seed_from_header(&self, header: &str, lifetime: Lifetime) {
        for cookie in Cookie::split_parse(header).filter_map(Result::ok) {
            self.set(cookie.name(), cookie.value(), lifetime);
        }
    }

    pub fn expires_at(&self, key: &str) -> Option<OffsetDateTime> {
        self.live().get(key).map(|cookie| cookie.expires_at)
    }

    // Persisted form of every live attribute, one `Set-Cookie` line each.
    pub fn set_cookie_lines(&self) -> Vec<String> {
        self.live()
            .iter()
            .map(|(key, cookie)| render_set_cookie(key, &cookie.value, cookie.expires_at))
            .collect()
    }

    // Drain the `Set-Cookie` lines that expire attributes removed by `delete_all`.
    pub fn take_removal_lines(&self) -> Vec<String> {
        let mut removals = self.removals.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *removals)
    }

    // Lock the table and drop anything that has expired.
    fn live(&self) -> MutexGuard<'_, BTreeMap<String, StoredCookie>> {
        let now = self.clock.now();
        let mut guard = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|_, cookie| cookie.expires_at > now);
        guard
    }
}

impl<C: Clock> SessionStore for CookieJar<C> {
    fn get(&self, key: &str) -> String {
        self.live()
            .get(key)
            .map(|cookie| cookie.value.clone())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str, lifetime: Lifetime) {
        let expires_at = lifetime.expires_at(self.clock.now());
        self.live().insert(
            key.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
    }

    fn keys(&self) -> Vec<String> {
        self.live().keys().cloned().collect()
    }

    fn delete_all(&self) {
        let mut guard = self.live();
        let removed: Vec<String> = guard.keys().map(|key| render_removal(key)).collect();
        guard.clear();
        drop(guard);
        tracing::debug!(count = removed.len(), "session attributes deleted");
        self.removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(removed);
    }

    fn cookie_header(&self) -> String {
        self.live()
            .iter()
            .map(|(key, cookie)| format!("{key}={}", cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn render_set_cookie(key: &str, value: &str, expires_at: OffsetDateTime) -> String {
    Cookie::build((key, value))
        .path("/")
        .secure(true)
        .same_site(SameSite::Strict)
        .expires(expires_at)
        .build()
        .to_string()
}

pub fn render_removal(key: &str) -> String {
    Cookie::build((key, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}
