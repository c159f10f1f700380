//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::VerificationError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Mail dispatch error: {message}")]
    Mail { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the verification protocol taxonomy
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type DomainResult<T> = Result<T, DomainError>;
