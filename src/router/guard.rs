//! Navigation guard.
//!
//! Evaluated before every screen change. The decision itself is a pure
//! function over the route's requirements and a snapshot of the session;
//! the async wrapper only adds lazy identity hydration for the
//! fresh-start case (a persisted valid credential with no profile loaded
//! yet). The snapshot is taken AFTER any await so a late-arriving
//! hydration result is judged by the state it actually produced.

use crate::auth::session::Session;
use crate::router::routes::{Route, RouteIntent, RouteRequirements};

/// Outcome of a guarded navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Proceed to the intended route.
    Allow,
    /// Abort and go elsewhere instead.
    Redirect(Route),
}

/// The facts the decision needs, frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessSnapshot {
    pub authenticated: bool,
    pub admin: bool,
}

impl AccessSnapshot {
    pub fn capture(session: &Session) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            admin: session.is_admin(),
        }
    }
}

/// Pure guard decision.
///
/// The guest check runs last: an expired-but-present credential leaves
/// `authenticated` false, so it must not block a guest-only route that
/// the earlier checks have already declined to claim.
pub fn evaluate(requirements: &RouteRequirements, access: &AccessSnapshot) -> GuardVerdict {
    if requirements.public {
        return GuardVerdict::Allow;
    }
    if requirements.requires_auth && !access.authenticated {
        return GuardVerdict::Redirect(Route::Login);
    }
    if requirements.requires_admin && !access.admin {
        return GuardVerdict::Redirect(Route::Login);
    }
    if requirements.requires_guest && access.authenticated {
        return GuardVerdict::Redirect(Route::AdminHome);
    }
    GuardVerdict::Allow
}

/// Guard one navigation attempt against the live session.
///
/// Public routes are allowed without touching the session at all. For
/// everything else, a valid persisted credential with no identity loaded
/// this run is hydrated first; hydration failure simply leaves the
/// session unauthenticated and the decision falls out of the snapshot.
pub async fn authorize(intent: &RouteIntent, session: &Session) -> GuardVerdict {
    if intent.requirements.public {
        return GuardVerdict::Allow;
    }

    if session.credential_valid() && !session.has_identity() {
        if let Err(err) = session.initialize().await {
            tracing::debug!("Identity hydration during navigation failed: {err}");
        }
    }

    evaluate(&intent.requirements, &AccessSnapshot::capture(session))
}
