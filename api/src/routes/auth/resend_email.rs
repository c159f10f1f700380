use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{DetailResponse, ResendEmailRequest};
use crate::handlers::error::internal_error_response;

use mp_core::errors::{DomainError, VerificationError};
use mp_core::repositories::VerificationStore;
use mp_core::services::verification::MailerTrait;
use mp_shared::utils::email::mask_email;

use super::AppState;

/// Handler for POST /api/v1/auth/resend-email
///
/// Issues a fresh confirmation challenge for an unverified address and
/// dispatches it by email. A new challenge also lifts an attempt lockout.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "detail": "Verification email sent." }
/// ```
///
/// Unknown addresses get the same 200 body, so the endpoint cannot be used
/// to probe which emails are registered.
///
/// ## Errors
/// - 400 Bad Request: malformed email, or address already verified
/// - 500 Internal Server Error: storage or mail transport failure
pub async fn resend_email<St, M>(
    state: web::Data<AppState<St, M>>,
    request: web::Json<ResendEmailRequest>,
) -> HttpResponse
where
    St: VerificationStore + 'static,
    M: MailerTrait + 'static,
{
    if request.validate().is_err() {
        return HttpResponse::BadRequest().json(DetailResponse::new("Invalid email address."));
    }

    log::info!(
        "Processing confirmation resend for: {}",
        mask_email(&request.email)
    );

    match state
        .verification_service
        .send_confirmation(&request.email)
        .await
    {
        Ok(result) => {
            log::info!(
                "Confirmation email dispatched to {}, message_id: {}",
                mask_email(&request.email),
                result.message_id
            );
            HttpResponse::Ok().json(DetailResponse::new("Verification email sent."))
        }
        Err(DomainError::Verification(VerificationError::InvalidTarget)) => {
            log::warn!(
                "Confirmation resend for unknown address: {}",
                mask_email(&request.email)
            );
            HttpResponse::Ok().json(DetailResponse::new("Verification email sent."))
        }
        Err(DomainError::Verification(VerificationError::AlreadyVerified)) => {
            HttpResponse::BadRequest().json(DetailResponse::new("Email is already verified."))
        }
        Err(error) => {
            log::error!("Failed to resend confirmation email: {:?}", error);
            internal_error_response()
        }
    }
}
