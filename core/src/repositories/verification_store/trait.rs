//! Verification store traits defining the persistence contract.
//!
//! The verify protocol needs more than plain repository calls: every
//! decision about an address has to be made against rows no other request
//! can touch until the outcome commits. `VerificationStore::begin` opens a
//! transaction; the reads on `VerificationTxn` acquire exclusive locks on
//! the rows they return (select-for-update semantics), and the locks are
//! held until `commit` or until the transaction is dropped, which rolls
//! everything back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{EmailAddress, EmailConfirmation, User};
use crate::errors::DomainError;

/// Factory for verification transactions
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Open a transaction. Locks taken through the returned handle are
    /// scoped to it; dropping the handle without committing rolls back.
    async fn begin(&self) -> Result<Box<dyn VerificationTxn>, DomainError>;
}

/// One open verification transaction
///
/// Reads lock the rows they return. Mutations become visible to other
/// transactions only after `commit`.
#[async_trait]
pub trait VerificationTxn: Send {
    /// Resolve a user account by email, locking the row
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError>;

    /// Resolve an email address by (email, owning user), locking the row
    async fn find_address(
        &mut self,
        email: &str,
        user_id: Uuid,
    ) -> Result<Option<EmailAddress>, DomainError>;

    /// Resolve an email address by id, locking the row
    async fn find_address_by_id(&mut self, id: Uuid) -> Result<Option<EmailAddress>, DomainError>;

    /// All outstanding confirmations for an address, in creation order,
    /// each locked
    async fn confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<Vec<EmailConfirmation>, DomainError>;

    /// Resolve a confirmation by its opaque key, locking the row
    async fn find_confirmation_by_key(
        &mut self,
        key: &str,
    ) -> Result<Option<EmailConfirmation>, DomainError>;

    /// Persist a newly issued confirmation
    async fn insert_confirmation(
        &mut self,
        confirmation: &EmailConfirmation,
    ) -> Result<(), DomainError>;

    /// Stamp the dispatch time on a confirmation
    async fn mark_confirmation_sent(
        &mut self,
        confirmation_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Consume a single confirmation record
    async fn delete_confirmation(&mut self, confirmation_id: Uuid) -> Result<(), DomainError>;

    /// Void every outstanding confirmation for an address (lockout).
    /// Returns the number of records removed.
    async fn delete_confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<u64, DomainError>;

    /// Flip the address to verified
    async fn mark_address_verified(&mut self, address_id: Uuid) -> Result<(), DomainError>;

    /// Increment the address's failure counter, returning the new count
    async fn record_failed_attempt(&mut self, address_id: Uuid) -> Result<i32, DomainError>;

    /// Reset the address's failure counter (new challenge, or success)
    async fn clear_failed_attempts(&mut self, address_id: Uuid) -> Result<(), DomainError>;

    /// Make every mutation in this transaction visible atomically
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
