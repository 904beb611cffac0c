//! Session and authorization subsystem.
//!
//! Provides:
//! - A file-backed single-slot credential store with local expiry checks
//!   and epoch tagging for stale-failure detection
//! - The session context object (login, logout, identity hydration,
//!   recomputed authorization predicates)
//! - An auth event bus carrying forced-logout signals from the transport
//!
//! ## Design Decisions
//! - The token's signature is never verified client-side; only the `exp`
//!   claim is inspected. The backend validates the signature per request.
//! - All credential mutations flow through the store so the epoch counter
//!   stays the single arbiter of which in-flight failures are current.

pub mod credentials;
pub mod events;
pub mod session;

pub use credentials::CredentialStore;
pub use events::{AuthEvent, AuthEvents};
pub use session::{Session, SessionPhase};
