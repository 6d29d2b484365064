// SPDX-License-Identifier: MIT

//! Session routes: login, register, logout, and session introspection.
//!
//! Handlers are thin orchestration over `AuthService`; their one extra
//! responsibility is keeping the cookie mirror in step with the durable
//! token store.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Credentials, RegisterResponse, Registration, UserProfile};
use crate::services::auth::AuthState;
use crate::store::cookie::{removal_cookie, session_cookie};
use crate::AppState;

/// Session introspection body, also returned by login.
#[derive(Serialize)]
pub struct SessionInfo {
    pub state: AuthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// `POST /auth/login` — authenticate and set the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse> {
    let user = state.auth.login(&credentials).await?;

    // The token is guaranteed persisted by the time login returns
    let token = state
        .auth
        .persisted_token()
        .ok_or_else(|| AppError::Storage("token missing after login".to_string()))?;

    let jar = jar.add(session_cookie(&state.config, &token));
    let body = SessionInfo {
        state: state.auth.state(),
        user: Some(user),
    };
    Ok((jar, Json(body)))
}

/// `POST /auth/register` — create an account; no session is established.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let response = state.auth.register(&registration).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/logout` — clear the session and remove the cookie mirror.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    state.auth.logout();
    let jar = jar.add(removal_cookie(&state.config));
    (jar, StatusCode::NO_CONTENT)
}

/// `GET /session` — report the observable session state.
pub async fn session_info(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    Json(SessionInfo {
        state: state.auth.state(),
        user: state.auth.current_user(),
    })
}

/// `GET /app/me` — the signed-in user's profile (behind the route guard).
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserProfile> {
    Json(user)
}
