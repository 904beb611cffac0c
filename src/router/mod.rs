//! Route table and navigation guard.

pub mod guard;
pub mod routes;

pub use guard::{authorize, evaluate, AccessSnapshot, GuardVerdict};
pub use routes::{Route, RouteIntent, RouteRequirements};
