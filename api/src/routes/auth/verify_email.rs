use actix_web::{web, HttpResponse};

use crate::dto::{DetailResponse, VerifyEmailRequest};
use crate::handlers::error::handle_verification_error;

use mp_core::repositories::VerificationStore;
use mp_core::services::verification::MailerTrait;
use mp_shared::utils::email::mask_email;

use super::AppState;

/// Handler for POST /api/v1/auth/verify-email
///
/// Proves ownership of an email address with either the 6-digit code from
/// the confirmation email or the raw key from its activation link.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "code": "482913"
/// }
/// ```
///
/// or, on the legacy link path:
///
/// ```json
/// {
///     "key": "pm2…64-char-key…Qz"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "detail": "Email successfully verified." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: missing input, unknown address, already verified,
///   invalid/expired code, attempt limit reached, or invalid key
/// - 500 Internal Server Error: storage failure
///
/// Unknown-user and unknown-address failures share one body, and every
/// key-path failure collapses into the generic invalid-key body.
pub async fn verify_email<St, M>(
    state: web::Data<AppState<St, M>>,
    request: web::Json<VerifyEmailRequest>,
) -> HttpResponse
where
    St: VerificationStore + 'static,
    M: MailerTrait + 'static,
{
    let request = request.into_inner();

    // A present code field selects the code path, even when blank
    if let Some(code) = request.code.as_deref() {
        let email = request.email.as_deref().unwrap_or_default();

        log::info!(
            "Processing code verification for: {}",
            mask_email(email)
        );

        match state.verification_service.verify_by_code(email, code).await {
            Ok(verified) => {
                log::info!(
                    "Email {} successfully verified with code",
                    mask_email(&verified.email)
                );
                HttpResponse::Ok().json(DetailResponse::new("Email successfully verified."))
            }
            Err(error) => handle_verification_error(&error),
        }
    } else if let Some(key) = request.key.as_deref() {
        match state.verification_service.verify_by_key(key).await {
            Ok(verified) => {
                log::info!(
                    "Email {} successfully verified with key",
                    mask_email(&verified.email)
                );
                HttpResponse::Ok().json(DetailResponse::new("Email successfully verified."))
            }
            Err(error) => {
                log::warn!("Key verification failed: {}", error);
                HttpResponse::BadRequest().json(DetailResponse::new("Invalid verification key."))
            }
        }
    } else {
        HttpResponse::BadRequest().json(DetailResponse::new(
            "Both email and verification code are required.",
        ))
    }
}
