//! Email confirmation entity: one outstanding verification challenge.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the opaque confirmation key
pub const KEY_LENGTH: usize = 64;

/// One outstanding verification challenge for an email address
///
/// Several confirmations may exist per address (re-sent challenges); all of
/// them are candidates during validation until one succeeds or the attempt
/// limit wipes them. A confirmation whose `sent` timestamp is `None` was
/// never dispatched and counts as expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfirmation {
    /// Unique identifier for the confirmation record
    pub id: Uuid,

    /// The email address this challenge confirms
    pub email_address_id: Uuid,

    /// Opaque high-entropy key; also the identifier codes are derived from
    pub key: String,

    /// When the confirmation email was dispatched, if ever
    pub sent: Option<DateTime<Utc>>,

    /// Timestamp when the challenge was created
    pub created_at: DateTime<Utc>,
}

impl EmailConfirmation {
    /// Creates a new challenge with a fresh random key, not yet dispatched
    pub fn new(email_address_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            email_address_id,
            key: Self::generate_key(),
            sent: None,
            created_at: Utc::now(),
        }
    }

    /// Generates a random alphanumeric confirmation key
    fn generate_key() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Checks whether the 6-digit code window has closed
    ///
    /// A never-dispatched challenge (`sent` is `None`) is expired.
    pub fn is_code_expired(&self, expiry_minutes: i64) -> bool {
        match self.sent {
            Some(sent) => Utc::now() > sent + Duration::minutes(expiry_minutes),
            None => true,
        }
    }

    /// Checks whether the raw key window has closed (legacy link path)
    pub fn is_key_expired(&self, expiry_days: i64) -> bool {
        match self.sent {
            Some(sent) => Utc::now() > sent + Duration::days(expiry_days),
            None => true,
        }
    }

    /// Stamps the dispatch time
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.sent = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_confirmation() {
        let address_id = Uuid::new_v4();
        let confirmation = EmailConfirmation::new(address_id);

        assert_eq!(confirmation.email_address_id, address_id);
        assert_eq!(confirmation.key.len(), KEY_LENGTH);
        assert!(confirmation.key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(confirmation.sent.is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let address_id = Uuid::new_v4();
        let keys: std::collections::HashSet<String> = (0..50)
            .map(|_| EmailConfirmation::new(address_id).key)
            .collect();
        assert_eq!(keys.len(), 50);
    }

    #[test]
    fn test_never_sent_counts_as_expired() {
        let confirmation = EmailConfirmation::new(Uuid::new_v4());
        assert!(confirmation.is_code_expired(15));
        assert!(confirmation.is_key_expired(3));
    }

    #[test]
    fn test_fresh_send_is_not_expired() {
        let mut confirmation = EmailConfirmation::new(Uuid::new_v4());
        confirmation.mark_sent(Utc::now());
        assert!(!confirmation.is_code_expired(15));
        assert!(!confirmation.is_key_expired(3));
    }

    #[test]
    fn test_code_window_closes_before_key_window() {
        let mut confirmation = EmailConfirmation::new(Uuid::new_v4());
        confirmation.mark_sent(Utc::now() - Duration::minutes(20));
        assert!(confirmation.is_code_expired(15));
        assert!(!confirmation.is_key_expired(3));
    }

    #[test]
    fn test_key_expiry() {
        let mut confirmation = EmailConfirmation::new(Uuid::new_v4());
        confirmation.mark_sent(Utc::now() - Duration::days(4));
        assert!(confirmation.is_key_expired(3));
    }
}
