// SPDX-License-Identifier: MIT

//! Route guard middleware.
//!
//! Routes are flagged by how they are composed: nests wrapped with
//! `require_auth` need a confirmed session, nests wrapped with
//! `require_anonymous` (login, register) bounce signed-in users.

use crate::store::cookie::removal_cookie;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Authenticated user, inserted as a request extension for downstream
/// handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub crate::models::UserProfile);

/// Middleware for routes that require a confirmed session.
///
/// The persisted-token check is synchronous: with no token anywhere there is
/// nothing to validate and the redirect is immediate, no network call. With
/// a token, validation always runs — even when in-memory state already says
/// authenticated — because in-memory state can be stale relative to a
/// backend that was reset underneath us.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if !has_any_token(&state, &jar) {
        return login_redirect(&state, &request);
    }

    if !state.auth.validate_token().await {
        tracing::debug!(path = request.uri().path(), "Session validation failed, redirecting");
        // A hard failure removed the durable token; evict the cookie mirror
        // too, or the stale cookie shadows the next login attempt for the
        // rest of its Max-Age.
        let jar = if state.auth.persisted_token().is_none() {
            jar.add(removal_cookie(&state.config))
        } else {
            jar
        };
        return (jar, login_redirect(&state, &request)).into_response();
    }

    if let Some(user) = state.auth.current_user() {
        request.extensions_mut().insert(CurrentUser(user));
    }

    next.run(request).await
}

/// Middleware for routes reserved for signed-out users (login, register).
///
/// Consults the durable store, not the cookie: the cookie is only a mirror
/// and can outlive an invalidated session, and a stale mirror must never
/// block a fresh login.
pub async fn require_anonymous(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.auth.persisted_token().is_some() {
        tracing::debug!(path = request.uri().path(), "Already signed in, redirecting home");
        return Redirect::temporary("/").into_response();
    }
    next.run(request).await
}

/// Token present in either representation: the mirrored cookie or the
/// durable store.
fn has_any_token(state: &AppState, jar: &CookieJar) -> bool {
    jar.get(&state.config.cookie_name)
        .map(|c| !c.value().is_empty())
        .unwrap_or(false)
        || state.auth.persisted_token().is_some()
}

/// Redirect to the login entry point, preserving the originally intended
/// destination as a `redirect` query parameter.
fn login_redirect(state: &AppState, request: &Request) -> Response {
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());

    let target = format!(
        "{}?redirect={}",
        state.config.login_path,
        urlencoding::encode(original)
    );
    Redirect::temporary(&target).into_response()
}
