// SPDX-License-Identifier: MIT

//! Services module - session logic over the backend API.

pub mod api;
pub mod auth;

pub use api::ApiClient;
pub use auth::{AuthService, AuthState};
