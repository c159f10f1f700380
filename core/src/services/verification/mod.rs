//! Email-verification service module
//!
//! This module implements the proof-of-email-ownership protocol:
//! - deterministic 6-digit code derivation from confirmation keys
//! - code and legacy-key validation with expiry and attempt limits
//! - the exactly-once verify transition, executed under storage locks
//! - confirmation email issuance through a pluggable mailer

mod code;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use code::{derive_code, CODE_LENGTH};
pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::MailerTrait;
pub use types::{ConfirmationEmail, SendConfirmationResult, VerifiedEmail};
