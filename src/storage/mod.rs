//! Storage layer for Bistro Core.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::BistroRepository;
