//! Common library for the Storedeck admin panel
//!
//! This crate provides shared infrastructure used by the Storedeck
//! services: PostgreSQL connection pooling and the database error
//! taxonomy.

pub mod database;
pub mod error;
