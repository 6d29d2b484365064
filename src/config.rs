//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible default except the backend API URL; a `.env`
//! file is honored for local development.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the FinTrack REST backend (e.g. `https://api.fintrack.example`)
    pub api_base_url: String,
    /// Server port
    pub port: u16,
    /// Path unauthenticated users are redirected to
    pub login_path: String,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Durable session file (token + cached profile)
    pub session_file: String,
    /// Name of the mirrored session cookie
    pub cookie_name: String,
    /// Cookie lifetime in seconds (default 7 days)
    pub cookie_max_age: u64,
    /// Set the `Secure` attribute on the session cookie (enable when the
    /// gateway is served over TLS)
    pub cookie_secure: bool,
    /// Timeout applied to all backend HTTP calls, in seconds
    pub http_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            port: 8080,
            login_path: "/login".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            session_file: ".fintrack-session.json".to_string(),
            cookie_name: "token".to_string(),
            cookie_max_age: 604_800,
            cookie_secure: false,
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("FINTRACK_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("FINTRACK_API_URL"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| ".fintrack-session.json".to_string()),
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "token".to_string()),
            cookie_max_age: env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604_800),
            cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
