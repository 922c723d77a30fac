//! Waiting Room Gate Service
//!
//! This library implements a waiting room gate for scheduled video meetings.
//! Attendees poll a status endpoint until the booking's host is detected as
//! present, then get redirected to a browser-openable join URL; the host's
//! client reports presence on page load.
//!
//! # Modules
//!
//! - `routes` / `handlers`: axum router and the three waiting room endpoints
//! - `services`: booking record store and join-URL normalization
//! - `auth`: session token verification for the organizer-only write path
//! - `client`: reqwest-based polling consumer (`WaitingRoomClient`)
//!
//! # Authorization
//!
//! Status and join-info reads are public. Recording host presence requires a
//! session token whose user id matches the booking's organizer; the client
//! side `?host=1` flag only selects which viewer fires the call.

pub mod auth;
pub mod client;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

// Re-export the main API types for ease of use
pub use auth::SessionAuth;
pub use client::{GateState, WaitingRoomClient, DEFAULT_POLL_INTERVAL};
pub use error::ServiceError;
pub use handlers::api::AppState;
pub use routes::create_router;
