// SPDX-License-Identifier: MIT

//! FinTrack gateway: session subsystem for the FinTrack finance backend.
//!
//! Logs users in against the backend REST API, persists the bearer token
//! (durable store + mirrored cookie), revalidates the session with a
//! de-duplicated live probe before protected navigation, and clears
//! dependent caches on logout.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use models::{Account, Category, Transaction};
use services::AuthService;
use std::sync::Arc;
use store::CollectionCache;

/// Shared application state: the single owning instance of the session
/// context, created at process start and passed by reference everywhere.
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub accounts: Arc<CollectionCache<Account>>,
    pub transactions: Arc<CollectionCache<Transaction>>,
    pub categories: Arc<CollectionCache<Category>>,
}
