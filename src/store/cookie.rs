// SPDX-License-Identifier: MIT

//! Session cookie mirror.
//!
//! The token is duplicated into a cookie so the route guard can gate
//! navigation without opening the durable store on every request. Attributes:
//! `Path=/; Max-Age=<cfg>; SameSite=Lax; HttpOnly`, plus `Secure` when the
//! gateway is served over TLS.

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::Config;

/// Build the session cookie carrying the bearer token.
pub fn session_cookie(config: &Config, token: &str) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.to_string()))
        .path("/")
        .max_age(time::Duration::seconds(config.cookie_max_age as i64))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(config.cookie_secure)
        .build()
}

/// Build the removal twin: same attributes, empty value, Max-Age=0.
///
/// Attributes must match `session_cookie` or browsers treat it as a
/// different cookie and keep the stale token.
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), String::new()))
        .path("/")
        .max_age(time::Duration::ZERO)
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(config.cookie_secure)
        .build()
}
