//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and schema bootstrap
//! - SQLite pragma configuration
//! - Repository layer for the `releases` table

pub mod repo;
pub mod schema;

pub use repo::ReleaseRepository;
pub use schema::init_db;
