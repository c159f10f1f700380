//! Email-verification protocol configuration

use serde::{Deserialize, Serialize};

/// Default number of minutes a 6-digit verification code stays valid
pub const DEFAULT_CODE_EXPIRY_MINUTES: i64 = 15;

/// Default number of wrong-code submissions before lockout
pub const DEFAULT_MAX_VERIFICATION_ATTEMPTS: i32 = 5;

/// Default number of days a raw confirmation key stays valid (legacy link path)
pub const DEFAULT_KEY_EXPIRY_DAYS: i64 = 3;

/// Verification protocol configuration
///
/// Injected explicitly into the verification service; nothing in the
/// protocol reads ambient process state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Secret used to derive 6-digit codes from confirmation keys
    pub secret_key: String,

    /// Number of minutes before a verification code expires
    pub code_expiry_minutes: i64,

    /// Maximum number of wrong-code submissions before lockout
    pub max_verification_attempts: i32,

    /// Rate-limit window in seconds. Declared override point; the
    /// validation path does not consult it.
    pub rate_limit_window_seconds: u64,

    /// Number of days before a raw confirmation key expires
    pub key_expiry_days: i64,

    /// Base URL for activation links embedded in confirmation emails
    pub activation_url_base: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            secret_key: String::from("change-me-in-production"),
            code_expiry_minutes: DEFAULT_CODE_EXPIRY_MINUTES,
            max_verification_attempts: DEFAULT_MAX_VERIFICATION_ATTEMPTS,
            rate_limit_window_seconds: 60,
            key_expiry_days: DEFAULT_KEY_EXPIRY_DAYS,
            activation_url_base: String::from("http://localhost:8080/verify-email"),
        }
    }
}

impl VerificationConfig {
    /// Create a new configuration with the given secret
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret_key = std::env::var("SECRET_KEY")
            .unwrap_or_else(|_| "change-me-in-production".to_string());
        let code_expiry_minutes = std::env::var("CODE_EXPIRY_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CODE_EXPIRY_MINUTES);
        let max_verification_attempts = std::env::var("MAX_VERIFICATION_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_VERIFICATION_ATTEMPTS);
        let activation_url_base = std::env::var("ACTIVATION_URL_BASE")
            .unwrap_or_else(|_| "http://localhost:8080/verify-email".to_string());

        Self {
            secret_key,
            code_expiry_minutes,
            max_verification_attempts,
            activation_url_base,
            ..Default::default()
        }
    }

    /// Set the code expiry window in minutes
    pub fn with_code_expiry_minutes(mut self, minutes: i64) -> Self {
        self.code_expiry_minutes = minutes;
        self
    }

    /// Set the attempt limit
    pub fn with_max_attempts(mut self, attempts: i32) -> Self {
        self.max_verification_attempts = attempts;
        self
    }

    /// Check if the deployment is still running on the default secret
    pub fn is_using_default_secret(&self) -> bool {
        self.secret_key == "change-me-in-production"
    }
}
