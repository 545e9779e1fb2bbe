//! Domain types for Bistro Core.
//!
//! This module contains the core business entities and value objects.

mod admin;
mod menu;

pub use admin::*;
pub use menu::*;
