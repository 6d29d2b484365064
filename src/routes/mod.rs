// SPDX-License-Identifier: MIT

//! HTTP route handlers and router assembly.

pub mod session;

use crate::middleware::{require_anonymous, require_auth};
use crate::AppState;
use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the complete router.
///
/// This is the route table: nests wrapped in `require_auth` are the
/// "requires authentication" routes, nests wrapped in `require_anonymous`
/// are reserved for signed-out users, and the rest are public.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from the frontend URL and localhost (dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Signed-out only
    let anonymous_routes = Router::new()
        .route("/auth/login", post(session::login))
        .route("/auth/register", post(session::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_anonymous,
        ));

    // Public
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/logout", post(session::logout))
        .route("/session", get(session::session_info));

    // Auth required
    let protected_routes = Router::new()
        .route("/app/me", get(session::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(anonymous_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
