//! Outbound SMTP configuration

use serde::{Deserialize, Serialize};

/// SMTP transport configuration for outbound verification emails
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// SMTP server hostname (e.g., smtp.gmail.com)
    pub host: String,

    /// SMTP server port (typically 587 for STARTTLS)
    pub port: u16,

    /// The email address/username for SMTP authentication
    pub username: String,

    /// The password or app-specific password for SMTP
    pub password: String,

    /// From address placed on outbound mail
    pub from_address: String,

    /// Use the console mock mailer instead of a real transport
    #[serde(default)]
    pub use_mock_mailer: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::from("no-reply@mailproof.dev"),
            use_mock_mailer: false,
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .unwrap_or(587);
        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address = std::env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "no-reply@mailproof.dev".to_string());
        let use_mock_mailer = std::env::var("USE_MOCK_MAILER")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host,
            port,
            username,
            password,
            from_address,
            use_mock_mailer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_config_default() {
        let config = MailConfig::default();
        assert_eq!(config.port, 587);
        assert!(!config.use_mock_mailer);
        assert_eq!(config.from_address, "no-reply@mailproof.dev");
    }
}
