//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the MailProof
//! application. It provides concrete implementations for the persistence
//! and delivery seams the core defines:
//!
//! - **Database**: MySQL implementation of the verification store using
//!   SQLx, with select-for-update row locking inside transactions
//! - **Email**: SMTP mailer built on lettre, plus a console mock for
//!   development and testing

use thiserror::Error;

pub mod database;
pub mod email;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Mail transport error: {0}")]
    Mail(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
