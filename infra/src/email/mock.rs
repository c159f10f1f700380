//! Mock Mailer Implementation
//!
//! A mock implementation of the confirmation mailer for development and
//! testing. Messages are logged to the console instead of being sent, and
//! kept in memory so tests can read back the dispatched code.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use mp_core::services::verification::{ConfirmationEmail, MailerTrait};
use mp_shared::utils::email::mask_email;

/// Mock mailer for development and testing
#[derive(Clone)]
pub struct MockMailer {
    /// Messages dispatched so far, by recipient
    sent_messages: Arc<Mutex<Vec<(String, ConfirmationEmail)>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockMailer {
    /// Create a new mock mailer
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a mock mailer with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }

    /// Get the most recent message sent to a recipient
    pub fn last_message_to(&self, to: &str) -> Option<ConfirmationEmail> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, message)| message.clone())
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailerTrait for MockMailer {
    async fn send_confirmation_email(
        &self,
        to: &str,
        message: &ConfirmationEmail,
    ) -> Result<String, String> {
        if self.simulate_failure {
            warn!(
                to = %mask_email(to),
                "Mock mailer simulating delivery failure"
            );
            return Err("Simulated mail delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK MAILER - CONFIRMATION EMAIL");
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Message ID: {}", message_id);
            println!("Code: {}", message.code);
            println!("Key: {}", message.key);
            println!("Link: {}", message.activate_url);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "mailer",
            provider = "mock",
            to = %mask_email(to),
            message_id = %message_id,
            "Confirmation email sent (mock)"
        );

        self.sent_messages
            .lock()
            .unwrap()
            .push((to.to_string(), message.clone()));

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_content() -> ConfirmationEmail {
        ConfirmationEmail {
            code: "000123".to_string(),
            key: "abc".to_string(),
            activate_url: "https://app.example.com/verify-email/abc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_mailer_records_messages() {
        let mailer = MockMailer::with_options(false, false);
        let result = mailer
            .send_confirmation_email("alice@example.com", &test_content())
            .await;

        assert!(result.is_ok());
        assert!(result.unwrap().starts_with("mock_"));
        assert_eq!(mailer.sent_count(), 1);

        let message = mailer.last_message_to("alice@example.com").unwrap();
        assert_eq!(message.code, "000123");
    }

    #[tokio::test]
    async fn test_mock_mailer_simulated_failure() {
        let mailer = MockMailer::with_options(false, true);
        let result = mailer
            .send_confirmation_email("alice@example.com", &test_content())
            .await;

        assert!(result.is_err());
        assert_eq!(mailer.sent_count(), 0);
    }
}
