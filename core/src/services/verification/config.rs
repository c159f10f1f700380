//! Configuration for the verification service

use mp_shared::config::verification::{
    VerificationConfig, DEFAULT_CODE_EXPIRY_MINUTES, DEFAULT_KEY_EXPIRY_DAYS,
    DEFAULT_MAX_VERIFICATION_ATTEMPTS,
};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Secret used to derive codes from confirmation keys
    pub secret_key: String,
    /// Number of minutes before a verification code expires
    pub code_expiry_minutes: i64,
    /// Maximum number of wrong-code submissions before lockout
    pub max_attempts: i32,
    /// Number of days before a raw confirmation key expires
    pub key_expiry_days: i64,
    /// Base URL for activation links embedded in confirmation emails
    pub activation_url_base: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            secret_key: String::from("change-me-in-production"),
            code_expiry_minutes: DEFAULT_CODE_EXPIRY_MINUTES,
            max_attempts: DEFAULT_MAX_VERIFICATION_ATTEMPTS,
            key_expiry_days: DEFAULT_KEY_EXPIRY_DAYS,
            activation_url_base: String::from("http://localhost:8080/verify-email"),
        }
    }
}

impl From<VerificationConfig> for VerificationServiceConfig {
    fn from(config: VerificationConfig) -> Self {
        Self {
            secret_key: config.secret_key,
            code_expiry_minutes: config.code_expiry_minutes,
            max_attempts: config.max_verification_attempts,
            key_expiry_days: config.key_expiry_days,
            activation_url_base: config.activation_url_base,
        }
    }
}
