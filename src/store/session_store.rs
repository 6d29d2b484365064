// SPDX-License-Identifier: MIT

//! Durable session storage: the bearer token plus the cached user profile.
//!
//! The persisted layout is two keys: the raw token string and the profile as
//! a JSON-serialized string. Reads are synchronous so the route guard can do
//! its no-token fast path without touching the event loop, and so a read
//! immediately after `save_token` returns is guaranteed to observe the token.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::UserProfile;

/// Persisted session layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default)]
    token: Option<String>,
    /// Profile as a JSON string, kept separate from the token so a corrupt
    /// profile never takes the token down with it
    #[serde(default)]
    profile: Option<String>,
}

enum Backend {
    File(PathBuf),
    Memory(Mutex<PersistedSession>),
}

/// Handle to the durable session store. Cheap to clone; clones share the
/// same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<Backend>,
}

impl SessionStore {
    /// Create a file-backed store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Arc::new(Backend::File(path.into())),
        }
    }

    /// Create an in-memory store (offline, for tests).
    pub fn new_mock() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(Mutex::new(PersistedSession::default()))),
        }
    }

    /// Persist the token, preserving any cached profile.
    pub fn save_token(&self, token: &str) -> Result<(), AppError> {
        let mut session = self.load();
        session.token = Some(token.to_string());
        self.persist(session)
    }

    /// Read the persisted token. Pure read: never mutates storage, and any
    /// unreadable/corrupt state simply reads as "no token".
    pub fn read_token(&self) -> Option<String> {
        self.load().token
    }

    /// Remove the token and the cached profile. Idempotent.
    pub fn remove(&self) -> Result<(), AppError> {
        self.persist(PersistedSession::default())
    }

    /// Cache the user profile alongside the token.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let encoded = serde_json::to_string(profile)
            .map_err(|e| AppError::Storage(format!("failed to encode profile: {e}")))?;
        let mut session = self.load();
        session.profile = Some(encoded);
        self.persist(session)
    }

    /// Read the cached profile. A present-but-unparsable profile is an error
    /// so the caller can discard and log it rather than silently using
    /// garbage.
    pub fn read_profile(&self) -> Result<Option<UserProfile>, AppError> {
        match self.load().profile {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::Storage(format!("corrupt cached profile: {e}"))),
        }
    }

    /// Drop the cached profile, keeping the token.
    pub fn clear_profile(&self) -> Result<(), AppError> {
        let mut session = self.load();
        session.profile = None;
        self.persist(session)
    }

    fn load(&self) -> PersistedSession {
        match self.backend.as_ref() {
            Backend::Memory(inner) => inner.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            Backend::File(path) => match fs::read_to_string(path) {
                Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), error = %e,
                        "Unreadable session file, treating as empty");
                    PersistedSession::default()
                }),
                Err(_) => PersistedSession::default(),
            },
        }
    }

    fn persist(&self, session: PersistedSession) -> Result<(), AppError> {
        match self.backend.as_ref() {
            Backend::Memory(inner) => {
                *inner.lock().unwrap_or_else(|e| e.into_inner()) = session;
                Ok(())
            }
            Backend::File(path) => {
                let contents = serde_json::to_string(&session)
                    .map_err(|e| AppError::Storage(format!("failed to encode session: {e}")))?;
                fs::write(path, contents)
                    .map_err(|e| AppError::Storage(format!("failed to write session file: {e}")))
            }
        }
    }

    /// Test hook: write a raw profile string, bypassing serialization.
    #[doc(hidden)]
    pub fn save_raw_profile(&self, raw: &str) -> Result<(), AppError> {
        let mut session = self.load();
        session.profile = Some(raw.to_string());
        self.persist(session)
    }
}
