//! Verification route handlers
//!
//! This module contains the email-verification endpoints:
//! - Verifying an address with a code or a legacy key
//! - Re-issuing a confirmation challenge

pub mod resend_email;
pub mod verify_email;

use std::sync::Arc;

use mp_core::repositories::VerificationStore;
use mp_core::services::verification::{MailerTrait, VerificationService};

/// Application state that holds shared services
pub struct AppState<St, M>
where
    St: VerificationStore,
    M: MailerTrait,
{
    pub verification_service: Arc<VerificationService<St, M>>,
}
