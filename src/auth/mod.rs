//! Authentication module for Bistro Core.
//!
//! Covers the full admin session flow:
//! - Password hashing and verification (bcrypt)
//! - JWT issuance and validation (HS256)
//! - The auth gate middleware protecting mutating routes

mod jwt;
mod middleware;
pub mod password;

pub use jwt::*;
pub use middleware::*;
