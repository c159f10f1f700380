//! Domain error to HTTP response mapping
//!
//! Every failure kind of the verification protocol has one fixed response
//! body; nothing from the underlying error ever reaches the client. The
//! raw error is logged server-side before the body is built.

use actix_web::HttpResponse;

use mp_core::errors::{DomainError, VerificationError};

use crate::dto::DetailResponse;

/// Handle domain errors from the code-verification path
pub fn handle_verification_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Verification(kind) => {
            log::warn!("Verification rejected: {:?}", kind);
            match kind {
                VerificationError::MissingInput => HttpResponse::BadRequest().json(
                    DetailResponse::new("Both email and verification code are required."),
                ),
                VerificationError::InvalidTarget => {
                    HttpResponse::BadRequest().json(DetailResponse::new("Invalid email address."))
                }
                VerificationError::AlreadyVerified => HttpResponse::BadRequest()
                    .json(DetailResponse::new("Email is already verified.")),
                VerificationError::InvalidOrExpiredCode => HttpResponse::BadRequest()
                    .json(DetailResponse::new("Invalid or expired verification code.")),
                VerificationError::TooManyAttempts => HttpResponse::BadRequest()
                    .json(DetailResponse::new("Too many incorrect verification attempts.")),
                VerificationError::InvalidKey => HttpResponse::BadRequest()
                    .json(DetailResponse::new("Invalid verification key.")),
            }
        }
        other => {
            log::error!("Unexpected error during email verification: {:?}", other);
            internal_error_response()
        }
    }
}

/// The catch-all 500 body
pub fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(DetailResponse::new("Verification failed. Please contact support."))
}
