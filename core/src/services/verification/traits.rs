//! Traits for outbound mail integration

use async_trait::async_trait;

use super::types::ConfirmationEmail;

/// Trait for the outbound confirmation mailer
#[async_trait]
pub trait MailerTrait: Send + Sync {
    /// Dispatch a confirmation email and return the provider message id
    async fn send_confirmation_email(
        &self,
        to: &str,
        message: &ConfirmationEmail,
    ) -> Result<String, String>;
}
