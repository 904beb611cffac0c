//! Authentication lifecycle events.
//!
//! The transport announces a forced logout (expired/revoked credential) on
//! this bus; the session announces login/logout. The console subscribes and
//! reacts by forcing the login screen, the terminal analog of the SPA's
//! hard redirect.

use tokio::sync::broadcast;

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The credential was rejected server-side and has been cleared.
    /// Navigation must fall back to the login entry point.
    SessionExpired,
    /// A login completed and an identity was adopted.
    LoggedIn,
    /// The session was torn down locally.
    LoggedOut,
}

/// Broadcast bus for [`AuthEvent`]s. Cheap to clone; subscribers that lag
/// behind simply miss old events, which is fine for UI-facing signals.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: AuthEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
