//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    derive_code, ConfirmationEmail, MailerTrait, SendConfirmationResult, VerificationService,
    VerificationServiceConfig, VerifiedEmail, CODE_LENGTH,
};
