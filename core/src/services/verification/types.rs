//! Types for verification service inputs and results

use uuid::Uuid;

use crate::domain::entities::EmailConfirmation;

/// Content of an outbound confirmation email
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    /// The human-typable 6-digit code
    pub code: String,
    /// The raw confirmation key (legacy link path)
    pub key: String,
    /// Activation URL embedding the key
    pub activate_url: String,
}

/// Result of issuing a confirmation challenge
#[derive(Debug, Clone)]
pub struct SendConfirmationResult {
    /// The challenge that was created and dispatched
    pub confirmation: EmailConfirmation,
    /// The mail provider message id
    pub message_id: String,
}

/// Result of a successful verification
#[derive(Debug, Clone)]
pub struct VerifiedEmail {
    /// The address that was verified
    pub email: String,
    /// Id of the verified address record
    pub email_address_id: Uuid,
    /// Owning user account
    pub user_id: Uuid,
}
