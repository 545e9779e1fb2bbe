//! HTTP API layer for Bistro Core.
//!
//! Provides REST endpoints for admin authentication, menu management,
//! and the public menu listing.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
