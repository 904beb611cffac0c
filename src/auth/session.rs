//! Session context.
//!
//! An explicitly constructed object, built once at startup and passed by
//! reference to the guard and the console, holding the authenticated
//! identity next to the credential slot. States move
//! `Anonymous → Hydrating → Authenticated`; `Anonymous` is reachable from
//! any state via logout or a rejected credential.
//!
//! The authorization predicates are recomputed on every read from the
//! credential slot, so an expired token flips `is_authenticated` to false
//! immediately, even while a profile is still cached in memory.

use crate::api;
use crate::api::error::ApiError;
use crate::api::models::UserProfile;
use crate::api::transport::Transport;
use crate::auth::credentials::CredentialStore;
use crate::auth::events::AuthEvent;
use parking_lot::RwLock;
use std::sync::Arc;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No verified identity. The starting and terminal state.
    Anonymous,
    /// A "who am I" call is in flight for a stored credential.
    Hydrating,
    /// Identity loaded and credential verified non-expired at load time.
    Authenticated,
}

/// Authenticated-identity cache plus the operations that move it.
pub struct Session {
    transport: Arc<Transport>,
    identity: RwLock<Option<UserProfile>>,
    phase: RwLock<SessionPhase>,
    /// Message for the login form after a rejected attempt.
    form_error: RwLock<Option<String>>,
    /// Serializes hydration so concurrent `initialize` calls fetch once.
    hydration: tokio::sync::Mutex<()>,
}

impl Session {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            identity: RwLock::new(None),
            phase: RwLock::new(SessionPhase::Anonymous),
            form_error: RwLock::new(None),
            hydration: tokio::sync::Mutex::new(()),
        }
    }

    fn store(&self) -> &Arc<CredentialStore> {
        self.transport.credential_store()
    }

    // ── Predicates (recomputed on read) ──────────────────────

    /// Identity loaded AND the stored credential is currently valid.
    pub fn is_authenticated(&self) -> bool {
        self.identity.read().is_some() && self.store().is_valid()
    }

    /// Authenticated and the profile carries the administrator flag.
    /// Never an error: every other state is simply `false`.
    pub fn is_admin(&self) -> bool {
        self.is_authenticated()
            && self
                .identity
                .read()
                .as_ref()
                .map(|profile| profile.is_admin)
                .unwrap_or(false)
    }

    /// Whether a profile has been loaded this run, regardless of validity.
    pub fn has_identity(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Whether the credential slot holds a currently valid token.
    pub fn credential_valid(&self) -> bool {
        self.store().is_valid()
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    pub fn identity(&self) -> Option<UserProfile> {
        self.identity.read().clone()
    }

    /// Message from the last rejected login, for inline display.
    pub fn form_error(&self) -> Option<String> {
        self.form_error.read().clone()
    }

    // ── Operations ───────────────────────────────────────────

    /// Exchange credentials for a token and adopt the returned identity
    /// directly, with no extra round trip. A rejected login changes
    /// nothing: no credential is stored, the state stays `Anonymous`, and
    /// the failure message is kept for the form.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        *self.form_error.write() = None;

        match api::auth::login(&self.transport, username, password).await {
            Ok(token) => {
                self.store().set(&token.access_token);
                *self.identity.write() = Some(token.user);
                *self.phase.write() = SessionPhase::Authenticated;
                self.transport.events().publish(AuthEvent::LoggedIn);
                tracing::info!("Signed in");
                Ok(())
            }
            Err(err) => {
                *self.form_error.write() = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Tear the session down. The server-side revocation is best effort:
    /// its failure is logged and the local state clears regardless.
    pub async fn logout(&self) {
        if self.store().is_valid() {
            if let Err(err) = api::auth::logout(&self.transport).await {
                tracing::warn!("Server-side logout failed: {err}");
            }
        }
        self.clear_local();
    }

    /// Verify the stored credential against the backend and load the
    /// profile. With no valid credential this short-circuits to
    /// `Anonymous` without issuing a request. Any fetch failure is
    /// treated as an invalid session: a stale-but-unexpired credential
    /// (revoked server-side) self-heals to logged-out here.
    pub async fn fetch_identity(&self) -> Result<UserProfile, ApiError> {
        if !self.store().is_valid() {
            self.clear_local();
            return Err(ApiError::Unauthorized);
        }

        let epoch = self.store().epoch();
        *self.phase.write() = SessionPhase::Hydrating;

        match api::auth::me(&self.transport).await {
            Ok(profile) => {
                // The fetch may have raced a logout or a fresh login; a
                // result from a superseded credential is discarded.
                if self.store().epoch() == epoch && self.store().is_valid() {
                    *self.identity.write() = Some(profile.clone());
                    *self.phase.write() = SessionPhase::Authenticated;
                    Ok(profile)
                } else {
                    *self.phase.write() = SessionPhase::Anonymous;
                    Err(ApiError::Unauthorized)
                }
            }
            Err(err) => {
                self.logout().await;
                Err(err)
            }
        }
    }

    /// Idempotent bootstrap: hydrate the identity when a valid credential
    /// exists and no profile is loaded yet; otherwise a no-op. Safe to
    /// call at startup and again before every guarded navigation.
    pub async fn initialize(&self) -> Result<(), ApiError> {
        let _guard = self.hydration.lock().await;
        if self.store().is_valid() && self.identity.read().is_none() {
            self.fetch_identity().await?;
        }
        Ok(())
    }

    /// Drop credential and identity; announce the logout if there was a
    /// session to announce.
    fn clear_local(&self) {
        self.store().clear();
        let had_identity = self.identity.write().take().is_some();
        *self.phase.write() = SessionPhase::Anonymous;
        *self.form_error.write() = None;
        if had_identity {
            self.transport.events().publish(AuthEvent::LoggedOut);
            tracing::info!("Signed out");
        }
    }
}
