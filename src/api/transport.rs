//! HTTP transport pipeline.
//!
//! Every outbound call funnels through [`Transport::dispatch`]: a request
//! stage that injects the bearer credential, the send itself, and a
//! response stage that either unwraps the typed payload or maps the
//! failure onto the [`ApiError`](super::error::ApiError) taxonomy. Each
//! stage short-circuits: a failed stage performs its side effect (notice,
//! credential invalidation) and rejects back to the caller. The transport
//! never swallows an error and never retries.
//!
//! A 401 on a call that was sent with a credential clears the slot and
//! announces `SessionExpired`, but only while the credential epoch is
//! unchanged, so the side effect fires at most once per credential
//! generation and a stale rejection cannot clobber a fresh login.

use crate::api::error::{ApiError, ErrorBody};
use crate::auth::credentials::CredentialStore;
use crate::auth::events::{AuthEvent, AuthEvents};
use crate::config::REQUEST_TIMEOUT_SECS;
use crate::notify::{Notice, SharedNotifier};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Shared HTTP transport with credential injection.
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
    notifier: SharedNotifier,
    events: AuthEvents,
}

impl Transport {
    /// Build the transport. The request timeout is fixed, not per-call.
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<CredentialStore>,
        notifier: SharedNotifier,
        events: AuthEvents,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
            notifier,
            events,
        })
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn credential_store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ── Verb helpers ─────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(self.http.get(self.url(path))).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.dispatch(self.http.get(self.url(path)).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.post(self.url(path)).json(body)).await
    }

    /// POST without a request body (logout, refresh).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(self.http.post(self.url(path))).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.put(self.url(path)).json(body)).await
    }

    /// DELETE, discarding whatever acknowledgment body the server returns.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _ack: serde_json::Value = self
            .dispatch(self.http.request(Method::DELETE, self.url(path)))
            .await?;
        Ok(())
    }

    // ── Pipeline stages ──────────────────────────────────────

    /// Run the full request/response pipeline for one call.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        // Request stage: attach the credential only while it is valid.
        let (bearer, epoch) = self.store.bearer_snapshot();
        let authenticated = bearer.is_some();
        let builder = match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        // Send. No response at all is a connectivity failure.
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                self.notifier
                    .notify(Notice::error("Network error, check your connection"));
                return Err(ApiError::Network(err));
            }
        };

        // Response stage: unwrap the payload or map the rejection.
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(ApiError::Network)?;
            return serde_json::from_slice(&bytes).map_err(ApiError::Decode);
        }
        Err(self.reject(status, response, authenticated, epoch).await)
    }

    /// Map a non-success response onto the error taxonomy, performing the
    /// per-status side effect exactly once.
    async fn reject(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        authenticated: bool,
        epoch: u64,
    ) -> ApiError {
        match status.as_u16() {
            401 => {
                // Only a call that actually carried the credential proves the
                // session is dead. A rejected anonymous call (bad login) is
                // the caller's problem.
                if authenticated && self.store.invalidate(epoch) {
                    self.notifier
                        .notify(Notice::warning("Session expired, please sign in again"));
                    self.events.publish(AuthEvent::SessionExpired);
                }
                ApiError::Unauthorized
            }
            403 => {
                self.notifier
                    .notify(Notice::error("You do not have permission for this action"));
                ApiError::Forbidden
            }
            404 => {
                self.notifier
                    .notify(Notice::error("The requested resource was not found"));
                ApiError::NotFound
            }
            status if status >= 500 => {
                self.notifier
                    .notify(Notice::error("Server error, please try again later"));
                ApiError::Server { status }
            }
            status => {
                let bytes = response.bytes().await.unwrap_or_default();
                let err = ErrorBody::parse(&bytes).into_rejection(status);
                self.notifier.notify(Notice::error(err.to_string()));
                err
            }
        }
    }
}
