//! Email address entity bound to a user account.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An email address bound to exactly one user account
///
/// `is_verified` flips to true exactly once, on successful confirmation.
/// The surrounding account system keeps at most one verified address per
/// account; this core does not enforce that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Unique identifier for the email address record
    pub id: Uuid,

    /// Owning user account
    pub user_id: Uuid,

    /// The address string
    pub email: String,

    /// Whether ownership of this address has been proven
    pub is_verified: bool,

    /// Whether this is the account's primary address
    pub is_primary: bool,
}

impl EmailAddress {
    /// Creates a new, unverified email address for a user
    pub fn new(user_id: Uuid, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            email,
            is_verified: false,
            is_primary: false,
        }
    }

    /// Creates a new primary address for a user (registration flow)
    pub fn new_primary(user_id: Uuid, email: String) -> Self {
        Self {
            is_primary: true,
            ..Self::new(user_id, email)
        }
    }

    /// Marks the address as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_address_is_unverified() {
        let address = EmailAddress::new(Uuid::new_v4(), "alice@example.com".to_string());
        assert!(!address.is_verified);
        assert!(!address.is_primary);
    }

    #[test]
    fn test_verify() {
        let mut address = EmailAddress::new_primary(Uuid::new_v4(), "alice@example.com".to_string());
        assert!(address.is_primary);
        address.verify();
        assert!(address.is_verified);
    }
}
