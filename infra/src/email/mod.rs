//! Email module - outbound confirmation mail transports

pub mod mock;
pub mod smtp;

pub use mock::MockMailer;
pub use smtp::SmtpMailer;
