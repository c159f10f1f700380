//! Verification protocol error taxonomy
//!
//! These kinds map one-to-one onto the fixed user-visible responses of the
//! verification endpoint. The presentation layer owns the response wording;
//! callers match on the kind, never on the message text.

use thiserror::Error;

/// Failure kinds of the email-verification protocol
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// Email or code was missing/blank in a code-path request
    #[error("Both email and verification code are required")]
    MissingInput,

    /// Unknown user or unknown email address. One kind for both so the
    /// endpoint cannot be used to probe which addresses are registered.
    #[error("Invalid email address")]
    InvalidTarget,

    /// The address has already been verified
    #[error("Email is already verified")]
    AlreadyVerified,

    /// No confirmation record yielded a valid, unexpired code match
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    /// The attempt limit was reached; outstanding challenges are voided
    #[error("Too many incorrect verification attempts")]
    TooManyAttempts,

    /// Legacy key path failure
    #[error("Invalid verification key")]
    InvalidKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_target_error_has_single_message() {
        // Unknown-user and unknown-address cases share this one variant,
        // so their rendered messages cannot diverge.
        let error = VerificationError::InvalidTarget;
        assert_eq!(error.to_string(), "Invalid email address");
    }

    #[test]
    fn test_error_kinds_are_comparable() {
        assert_eq!(
            VerificationError::TooManyAttempts,
            VerificationError::TooManyAttempts
        );
        assert_ne!(
            VerificationError::InvalidOrExpiredCode,
            VerificationError::TooManyAttempts
        );
    }
}
