//! # MailProof Core
//!
//! Core business logic and domain layer for the MailProof backend.
//! This crate contains domain entities, the verification service,
//! store interfaces, and error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
