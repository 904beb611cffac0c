//! Typed client for the Aquaview backend REST API.
//!
//! All calls go through the [`transport::Transport`] pipeline, which owns
//! credential injection and failure normalization; the endpoint modules
//! stay thin request wrappers over the backend contract.

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod transport;
pub mod water_quality;

pub use error::ApiError;
pub use transport::Transport;
