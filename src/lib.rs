//! Aquaview — client and admin console for the water-quality service.
//!
//! The crate centers on the session/authorization subsystem:
//! [`auth::CredentialStore`] persists the bearer credential,
//! [`api::Transport`] injects and polices it on every call,
//! [`auth::Session`] caches the verified identity and exposes the
//! authorization predicates, and [`router::guard`] gates every screen
//! change in the console.

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod notify;
pub mod router;

use std::sync::Arc;

pub use api::{ApiError, Transport};
pub use auth::{AuthEvent, AuthEvents, CredentialStore, Session, SessionPhase};
pub use config::Config;
pub use router::{Route, RouteIntent};

/// Wire up the client stack: credential store, transport, session.
///
/// The one construction point for the session context. Everything
/// downstream (guard, console, CLI commands) borrows these handles
/// instead of reaching for ambient globals.
pub fn bootstrap(
    config: &Config,
    notifier: notify::SharedNotifier,
) -> anyhow::Result<(Arc<Transport>, Arc<Session>)> {
    let store = Arc::new(CredentialStore::open(&config.storage_dir()));
    let transport = Arc::new(Transport::new(
        config.api_url.clone(),
        store,
        notifier,
        AuthEvents::new(),
    )?);
    let session = Arc::new(Session::new(transport.clone()));
    Ok((transport, session))
}
