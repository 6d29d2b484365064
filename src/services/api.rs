// SPDX-License-Identifier: MIT

//! FinTrack backend API client.
//!
//! Handles:
//! - Login and registration calls
//! - The session-validity probe (an authenticated "list accounts" request)
//! - Failure classification: credential rejection vs. session rejection vs.
//!   no-response vs. unexpected status

use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Credentials, LoginResponse, RegisterResponse, Registration};

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the ambient timeout from config.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Authenticate with the backend.
    ///
    /// Any rejection (wrong password, unknown user) surfaces as
    /// `AppError::Credentials` with the backend's message; transport failures
    /// surface as `AppError::Network`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AppError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_auth_rejection(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed login response: {e}")))
    }

    /// Create a new account. Does not log the user in.
    pub async fn register(&self, registration: &Registration) -> Result<RegisterResponse, AppError> {
        let url = format!("{}/auth/register", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(registration)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_auth_rejection(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed register response: {e}")))
    }

    /// Session-validity probe: list the user's accounts.
    ///
    /// Used purely as an oracle — the body is discarded. The backend is the
    /// only party that knows whether the token still maps to an existing
    /// principal, so only a live round-trip can answer this.
    pub async fn probe_accounts(&self, token: &str) -> Result<(), AppError> {
        let url = format!("{}/accounts", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Self::check_authenticated_response(response).await
    }

    /// Classify an authenticated response: 2xx ok, 401/403 session rejection,
    /// anything else unexpected.
    async fn check_authenticated_response(response: reqwest::Response) -> Result<(), AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let code = status.as_u16();
        if code == 401 || code == 403 {
            return Err(AppError::SessionRejected(code));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = code, body = %body, "Unexpected backend status");
        Err(AppError::UnexpectedStatus(code))
    }

    /// Classify a failed login/register response. Only a 4xx is the backend
    /// actually rejecting the credentials; a 5xx says nothing about them and
    /// must not be reported as a credential problem.
    async fn classify_auth_rejection(response: reqwest::Response) -> AppError {
        let status = response.status();
        if status.is_client_error() {
            return AppError::Credentials(Self::rejection_message(response).await);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "Unexpected backend status");
        AppError::UnexpectedStatus(status.as_u16())
    }

    /// Extract a human-readable message from a rejection body, falling back
    /// to the status line.
    async fn rejection_message(response: reqwest::Response) -> String {
        #[derive(Deserialize)]
        struct Rejection {
            #[serde(alias = "error")]
            message: String,
        }

        let status = response.status();
        match response.json::<Rejection>().await {
            Ok(rejection) => rejection.message,
            Err(_) => format!("HTTP {status}"),
        }
    }
}
