// SPDX-License-Identifier: MIT

//! Auth session state machine and session validator.
//!
//! One `AuthService` instance owns the process-wide session: the bearer
//! token, the cached profile, and the validated/validating flags. All
//! mutation goes through its methods; the only other component that touches
//! persisted state is the `SessionStore` primitive it wraps.
//!
//! Validation is a live network probe, de-duplicated so concurrent callers
//! share one outstanding request: the `try_lock` winner runs the probe while
//! late callers wait on the same lock and then re-derive the answer from
//! session state (the in-flight probe may have replaced or cleared the
//! token, so the winner's raw result is not theirs to reuse).

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{Credentials, RegisterResponse, Registration, UserProfile};
use crate::services::api::ApiClient;
use crate::store::{Resettable, SessionStore};

/// Observable session states.
///
/// `Invalid` means a validation hard-failed this process lifetime and the
/// token was cleared; it is left by `init` or a fresh `login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    Anonymous,
    Pending,
    Validating,
    Authenticated,
    Invalid,
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
    validated: bool,
    validating: bool,
    invalidated: bool,
}

/// The auth session service.
pub struct AuthService {
    api: ApiClient,
    store: SessionStore,
    session: Mutex<Session>,
    /// Single-flight guard for the validation probe.
    inflight: tokio::sync::Mutex<()>,
    /// Sibling stores cleared on logout, injected at construction.
    resetters: Vec<Arc<dyn Resettable>>,
}

impl AuthService {
    pub fn new(api: ApiClient, store: SessionStore, resetters: Vec<Arc<dyn Resettable>>) -> Self {
        Self {
            api,
            store,
            session: Mutex::new(Session::default()),
            inflight: tokio::sync::Mutex::new(()),
            resetters,
        }
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    /// Rehydrate the session from durable storage at process start.
    ///
    /// A persisted token puts the session in `Pending` (present but not yet
    /// validated this lifetime). The cached profile is best-effort: corrupt
    /// data is discarded and logged, never fatal.
    pub fn init(&self) {
        match self.store.read_token() {
            Some(token) => {
                let user = match self.store.read_profile() {
                    Ok(profile) => profile,
                    Err(err) => {
                        tracing::warn!(error = %err, "Discarding corrupt cached profile");
                        if let Err(err) = self.store.clear_profile() {
                            tracing::warn!(error = %err, "Failed to clear corrupt profile");
                        }
                        None
                    }
                };
                tracing::debug!(has_profile = user.is_some(), "Session rehydrated, pending validation");
                self.with_session(|s| {
                    *s = Session {
                        token: Some(token),
                        user,
                        ..Session::default()
                    };
                });
            }
            None => {
                // No token: clear any stray cached profile from a past session
                if let Err(err) = self.store.clear_profile() {
                    tracing::warn!(error = %err, "Failed to clear stray cached profile");
                }
                self.with_session(|s| *s = Session::default());
            }
        }
    }

    /// Log in against the backend.
    ///
    /// Login itself proves validity, so success lands directly in
    /// `Authenticated` with no extra probe. The token is persisted before
    /// the in-memory flags flip, so a synchronous persisted read immediately
    /// after this returns sees the token. Failure leaves the session clean
    /// and propagates the error.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AppError> {
        match self.api.login(credentials).await {
            Ok(response) => {
                self.store.save_token(&response.token)?;
                if let Err(err) = self.store.save_profile(&response.user) {
                    tracing::warn!(error = %err, "Failed to cache profile");
                }
                self.with_session(|s| {
                    *s = Session {
                        token: Some(response.token.clone()),
                        user: Some(response.user.clone()),
                        validated: true,
                        ..Session::default()
                    };
                });
                tracing::info!(user = %response.user.email, "Login successful");
                Ok(response.user)
            }
            Err(err) => {
                tracing::info!(error = %err, "Login failed, clearing session");
                self.clear_session(false);
                Err(err)
            }
        }
    }

    /// Register a new account. Registration is not auto-login: the session
    /// is untouched either way, and errors propagate to the caller.
    pub async fn register(&self, registration: &Registration) -> Result<RegisterResponse, AppError> {
        self.api.register(registration).await
    }

    /// Log out unconditionally: safe from any state, including while a
    /// validation probe is in flight (the probe's token-unchanged check
    /// discards its stale result).
    pub fn logout(&self) {
        tracing::info!("Logging out");
        self.clear_session(false);
    }

    /// Confirm with the backend that the persisted token still maps to an
    /// existing principal. Never errors: every failure is folded into a
    /// `false` return plus the appropriate side effects.
    ///
    /// - no persisted token: `false`, no network call
    /// - 401/403: hard failure, session cleared
    /// - no response (connect/timeout): ambiguous — token kept for a later
    ///   retry, validated flag dropped
    /// - other non-2xx: treated as hard failure out of caution
    /// - 2xx: `true` iff the persisted token is unchanged since the probe
    ///   started
    pub async fn validate_token(&self) -> bool {
        let Some(token_at_start) = self.store.read_token() else {
            tracing::debug!("No persisted token, skipping validation probe");
            return false;
        };

        // No await between try_lock and the validating flag below, so two
        // callers in the same tick cannot both start a probe.
        match self.inflight.try_lock() {
            Ok(_guard) => self.run_probe(token_at_start).await,
            Err(_) => {
                // Another validation is in flight: wait for it, then answer
                // from the state it left behind.
                let _guard = self.inflight.lock().await;
                self.is_authenticated()
            }
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// `true` iff a token is present and validated this lifetime.
    pub fn is_authenticated(&self) -> bool {
        self.with_session(|s| s.token.is_some() && s.validated)
    }

    /// Derived observable state.
    pub fn state(&self) -> AuthState {
        self.with_session(|s| {
            if s.validating {
                AuthState::Validating
            } else if s.token.is_some() && s.validated {
                AuthState::Authenticated
            } else if s.token.is_some() {
                AuthState::Pending
            } else if s.invalidated {
                AuthState::Invalid
            } else {
                AuthState::Anonymous
            }
        })
    }

    /// In-memory profile, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.with_session(|s| s.user.clone())
    }

    /// In-memory token, if any.
    pub fn token(&self) -> Option<String> {
        self.with_session(|s| s.token.clone())
    }

    /// Synchronous durable-store read, used by the route guard's fast path.
    pub fn persisted_token(&self) -> Option<String> {
        self.store.read_token()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    async fn run_probe(&self, token_at_start: String) -> bool {
        self.with_session(|s| s.validating = true);

        let outcome = self.api.probe_accounts(&token_at_start).await;

        let result = match outcome {
            Ok(()) => {
                // Epoch guard: a concurrent logout (e.g. a 401 interceptor)
                // may have replaced or removed the token mid-flight, in
                // which case this success says nothing about the current
                // session.
                if self.store.read_token().as_deref() == Some(token_at_start.as_str()) {
                    self.with_session(|s| {
                        s.token = Some(token_at_start);
                        s.validated = true;
                        s.invalidated = false;
                    });
                    true
                } else {
                    tracing::warn!("Token changed during validation, discarding stale probe result");
                    false
                }
            }
            Err(err) if err.is_hard_session_failure() => {
                // Same epoch guard as the success path: if the token is
                // already gone, this rejection belongs to a dead session and
                // must not re-clear state a concurrent logout just reset.
                if self.store.read_token().as_deref() == Some(token_at_start.as_str()) {
                    tracing::info!(error = %err, "Validation hard failure, clearing session");
                    self.clear_session(true);
                } else {
                    tracing::warn!(error = %err, "Token changed during validation, discarding stale rejection");
                }
                false
            }
            Err(err) => {
                // No response at all: do not punish a transient outage by
                // dropping the token; leave the session unvalidated so a
                // later check can retry.
                tracing::warn!(error = %err, "Validation probe got no response, keeping token");
                self.with_session(|s| s.validated = false);
                false
            }
        };

        self.with_session(|s| s.validating = false);
        result
    }

    /// Clear in-memory and persisted session state and reset dependent
    /// stores. Reset failures are logged, never propagated: a broken sibling
    /// cache must not block logout.
    fn clear_session(&self, invalidated: bool) {
        if let Err(err) = self.store.remove() {
            tracing::warn!(error = %err, "Failed to remove persisted session");
        }
        self.with_session(|s| {
            *s = Session {
                invalidated,
                ..Session::default()
            };
        });
        for resetter in &self.resetters {
            if let Err(err) = resetter.reset() {
                tracing::warn!(store = resetter.name(), error = %err,
                    "Failed to reset dependent store during logout");
            }
        }
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        // A poisoned lock only means a writer panicked mid-update; the data
        // is plain flags and strings, so recover it rather than propagate.
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut session)
    }
}
