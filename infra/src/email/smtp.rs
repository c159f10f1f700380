//! SMTP mailer implementation
//!
//! Sends confirmation emails through an authenticated SMTP relay using
//! lettre's async transport. Implements the core `MailerTrait` seam.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use mp_core::services::verification::{ConfirmationEmail, MailerTrait};
use mp_shared::config::MailConfig;
use mp_shared::utils::email::mask_email;

use crate::InfrastructureError;

/// SMTP implementation of the confirmation mailer
pub struct SmtpMailer {
    /// Pooled async SMTP transport
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// From address placed on outbound mail
    from_address: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    fn build_message(&self, to: &str, content: &ConfirmationEmail) -> Result<Message, String> {
        let body = format!(
            "Hello,\n\n\
             Confirm your email address by entering this code:\n\n\
             \t{}\n\n\
             Or open this link:\n\n\
             \t{}\n\n\
             If you did not sign up, you can ignore this message.\n",
            content.code, content.activate_url
        );

        Message::builder()
            .from(self
                .from_address
                .parse()
                .map_err(|e| format!("invalid from address: {}", e))?)
            .to(to.parse().map_err(|e| format!("invalid recipient: {}", e))?)
            .subject("Confirm your email address")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| format!("failed to build message: {}", e))
    }
}

#[async_trait]
impl MailerTrait for SmtpMailer {
    async fn send_confirmation_email(
        &self,
        to: &str,
        message: &ConfirmationEmail,
    ) -> Result<String, String> {
        let email = self.build_message(to, message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| format!("SMTP send failed: {}", e))?;

        let message_id = response.message().collect::<Vec<&str>>().join(" ");

        tracing::info!(
            to = %mask_email(to),
            message_id = %message_id,
            "Confirmation email handed to SMTP relay"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_content() -> ConfirmationEmail {
        ConfirmationEmail {
            code: "482913".to_string(),
            key: "k".repeat(64),
            activate_url: format!("https://app.example.com/verify-email/{}", "k".repeat(64)),
        }
    }

    #[tokio::test]
    async fn test_build_message_embeds_code_and_link() {
        let mailer = SmtpMailer::new(&MailConfig::default()).unwrap();
        let content = test_content();

        let message = mailer.build_message("alice@example.com", &content);
        assert!(message.is_ok());

        let rendered = String::from_utf8(message.unwrap().formatted()).unwrap();
        assert!(rendered.contains("482913"));
        assert!(rendered.contains(&content.activate_url));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(&MailConfig::default()).unwrap();
        let result = mailer.build_message("not an address", &test_content());
        assert!(result.is_err());
    }
}
