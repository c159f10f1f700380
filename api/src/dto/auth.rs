//! DTOs for the verification endpoints

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for POST /api/v1/auth/verify-email
///
/// Carries either a 6-digit `code` plus the `email` it belongs to, or a
/// raw confirmation `key` (legacy link path). A present `code` field wins
/// even when a `key` is also supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    /// 6-digit verification code
    #[serde(default)]
    pub code: Option<String>,

    /// Email address the code was issued for
    #[serde(default)]
    pub email: Option<String>,

    /// Legacy verification key
    #[serde(default)]
    pub key: Option<String>,
}

/// Request body for POST /api/v1/auth/resend-email
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendEmailRequest {
    /// Email address to issue a fresh challenge for
    #[validate(email)]
    pub email: String,
}

/// The single-field response body every verification endpoint uses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    /// Create a new detail response
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
