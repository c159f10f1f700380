//! MySQL-specific database implementations
//!
//! This module contains the MySQL implementation of the verification
//! store trait using SQLx for database operations.

pub mod verification_store_impl;

// Re-export the MySQL implementation
pub use verification_store_impl::MySqlVerificationStore;
