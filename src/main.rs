// SPDX-License-Identifier: MIT

//! FinTrack Gateway
//!
//! Serves the session/auth surface for the FinTrack finance backend:
//! login/logout/register, session validation, and guarded app routes.

use fintrack_gateway::{
    config::Config,
    services::{ApiClient, AuthService},
    store::{CollectionCache, Resettable, SessionStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, backend = %config.api_base_url, "Starting FinTrack gateway");

    let store = SessionStore::new(&config.session_file);
    let api = ApiClient::new(&config).expect("Failed to build backend client");

    // Feature caches, registered with the auth service so logout clears them
    let accounts = Arc::new(CollectionCache::new("accounts"));
    let transactions = Arc::new(CollectionCache::new("transactions"));
    let categories = Arc::new(CollectionCache::new("categories"));
    let resetters: Vec<Arc<dyn Resettable>> =
        vec![accounts.clone(), transactions.clone(), categories.clone()];

    let auth = AuthService::new(api, store, resetters);

    // Rehydrate any persisted session; it stays pending until validated
    auth.init();
    tracing::info!(state = ?auth.state(), "Session rehydrated");

    let state = Arc::new(AppState {
        config: config.clone(),
        auth,
        accounts,
        transactions,
        categories,
    });

    let app = fintrack_gateway::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fintrack_gateway=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
