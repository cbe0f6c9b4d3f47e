use crate::domain::exchange::RequestContext;
use crate::domain::ports::SessionStore;
use crate::domain::session::{
    keys, Lifetime, HEAD_OFFICE_FLAG, LONG_RENEWAL_KEYS, SHORT_RENEWAL_KEYS,
};

// Typed accessors over the raw session store.

pub fn auth_token(store: &dyn SessionStore) -> String {
    store.get(keys::AUTH_TOKEN)
}

pub fn set_auth_token(store: &dyn SessionStore, token: &str) {
    store.set(keys::AUTH_TOKEN, token, Lifetime::Long);
}

pub fn xsrf_token(store: &dyn SessionStore) -> String {
    store.get(keys::XSRF_TOKEN)
}

pub fn logout_url(store: &dyn SessionStore) -> String {
    store.get(keys::LOGOUT_URL)
}

pub fn set_logout_url(store: &dyn SessionStore, url: &str) {
    store.set(keys::LOGOUT_URL, url, Lifetime::Long);
}

pub fn move_url(store: &dyn SessionStore) -> String {
    store.get(keys::MOVE_URL)
}

pub fn set_move_url(store: &dyn SessionStore, url: &str) {
    store.set(keys::MOVE_URL, url, Lifetime::Long);
}

pub fn password_change_url(store: &dyn SessionStore) -> String {
    store.get(keys::PASSWORD_CHANGE_URL)
}

pub fn set_password_change_url(store: &dyn SessionStore, url: &str) {
    store.set(keys::PASSWORD_CHANGE_URL, url, Lifetime::Long);
}

pub fn request_parameter_r(store: &dyn SessionStore) -> String {
    store.get(keys::REQUEST_PARAMETER_R)
}

pub fn set_request_parameter_r(store: &dyn SessionStore, value: &str) {
    store.set(keys::REQUEST_PARAMETER_R, value, Lifetime::Long);
}

pub fn is_head_office_user(store: &dyn SessionStore) -> bool {
    store.get(keys::HONBU_FLAG) == HEAD_OFFICE_FLAG
}

// Credentials for one call, read synchronously right before it executes.
// A missing token yields an empty value; the server answers 401 for it.
pub fn request_context(store: &dyn SessionStore) -> RequestContext {
    RequestContext {
        auth_token: auth_token(store),
        xsrf_token: xsrf_token(store),
        cookies: store.cookie_header(),
    }
}

// Push the expiry of every renewable attribute that is currently present.
// Expiries restart from now on every call.
pub fn renew_session(store: &dyn SessionStore) {
    let mut renewed = 0usize;
    for key in store.keys() {
        let lifetime = if SHORT_RENEWAL_KEYS.contains(&key.as_str()) {
            Lifetime::Short
        } else if LONG_RENEWAL_KEYS.contains(&key.as_str()) {
            Lifetime::Long
        } else {
            continue;
        };
        let value = store.get(&key);
        store.set(&key, &value, lifetime);
        renewed += 1;
    }
    tracing::trace!(renewed, "session attributes renewed");
}

// Read the logout URL, then drop every attribute. Returns the URL to leave through.
pub fn end_session(store: &dyn SessionStore) -> String {
    let url = logout_url(store);
    store.delete_all();
    url
}
