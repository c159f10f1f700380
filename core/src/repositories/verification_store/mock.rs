//! In-memory implementation of the verification store for testing
//!
//! Reproduces the two properties the protocol leans on without a database:
//! a transaction holds an exclusive lock for its whole lifetime (one tokio
//! mutex over the store state), and mutations are atomic (they apply to a
//! working copy that replaces the shared state on commit; dropping the
//! transaction discards the copy).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::entities::{EmailAddress, EmailConfirmation, User};
use crate::errors::DomainError;

use super::trait_::{VerificationStore, VerificationTxn};

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: Vec<User>,
    addresses: Vec<EmailAddress>,
    confirmations: Vec<EmailConfirmation>,
    attempts: HashMap<Uuid, i32>,
}

/// Mock verification store for testing
pub struct MockVerificationStore {
    state: Arc<Mutex<StoreState>>,
}

impl MockVerificationStore {
    /// Create a new, empty mock store
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    /// Seed a user account
    pub async fn insert_user(&self, user: User) {
        self.state.lock().await.users.push(user);
    }

    /// Seed an email address
    pub async fn insert_address(&self, address: EmailAddress) {
        self.state.lock().await.addresses.push(address);
    }

    /// Seed an outstanding confirmation
    pub async fn insert_confirmation(&self, confirmation: EmailConfirmation) {
        self.state.lock().await.confirmations.push(confirmation);
    }

    /// Inspect an address by id
    pub async fn address_by_id(&self, id: Uuid) -> Option<EmailAddress> {
        self.state
            .lock()
            .await
            .addresses
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Inspect the confirmations currently stored for an address
    pub async fn confirmations_for(&self, address_id: Uuid) -> Vec<EmailConfirmation> {
        self.state
            .lock()
            .await
            .confirmations
            .iter()
            .filter(|c| c.email_address_id == address_id)
            .cloned()
            .collect()
    }

    /// Inspect the failure counter for an address
    pub async fn failed_attempts(&self, address_id: Uuid) -> i32 {
        self.state
            .lock()
            .await
            .attempts
            .get(&address_id)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for MockVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationStore for MockVerificationStore {
    async fn begin(&self) -> Result<Box<dyn VerificationTxn>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MockVerificationTxn { guard, working }))
    }
}

/// Transaction handle over the mock store
pub struct MockVerificationTxn {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

#[async_trait]
impl VerificationTxn for MockVerificationTxn {
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .working
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_address(
        &mut self,
        email: &str,
        user_id: Uuid,
    ) -> Result<Option<EmailAddress>, DomainError> {
        Ok(self
            .working
            .addresses
            .iter()
            .find(|a| a.email == email && a.user_id == user_id)
            .cloned())
    }

    async fn find_address_by_id(&mut self, id: Uuid) -> Result<Option<EmailAddress>, DomainError> {
        Ok(self.working.addresses.iter().find(|a| a.id == id).cloned())
    }

    async fn confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<Vec<EmailConfirmation>, DomainError> {
        Ok(self
            .working
            .confirmations
            .iter()
            .filter(|c| c.email_address_id == address_id)
            .cloned()
            .collect())
    }

    async fn find_confirmation_by_key(
        &mut self,
        key: &str,
    ) -> Result<Option<EmailConfirmation>, DomainError> {
        Ok(self
            .working
            .confirmations
            .iter()
            .find(|c| c.key == key)
            .cloned())
    }

    async fn insert_confirmation(
        &mut self,
        confirmation: &EmailConfirmation,
    ) -> Result<(), DomainError> {
        self.working.confirmations.push(confirmation.clone());
        Ok(())
    }

    async fn mark_confirmation_sent(
        &mut self,
        confirmation_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        match self
            .working
            .confirmations
            .iter_mut()
            .find(|c| c.id == confirmation_id)
        {
            Some(confirmation) => {
                confirmation.sent = Some(at);
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: "EmailConfirmation".to_string(),
            }),
        }
    }

    async fn delete_confirmation(&mut self, confirmation_id: Uuid) -> Result<(), DomainError> {
        self.working.confirmations.retain(|c| c.id != confirmation_id);
        Ok(())
    }

    async fn delete_confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<u64, DomainError> {
        let before = self.working.confirmations.len();
        self.working
            .confirmations
            .retain(|c| c.email_address_id != address_id);
        Ok((before - self.working.confirmations.len()) as u64)
    }

    async fn mark_address_verified(&mut self, address_id: Uuid) -> Result<(), DomainError> {
        match self
            .working
            .addresses
            .iter_mut()
            .find(|a| a.id == address_id)
        {
            Some(address) => {
                address.is_verified = true;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: "EmailAddress".to_string(),
            }),
        }
    }

    async fn record_failed_attempt(&mut self, address_id: Uuid) -> Result<i32, DomainError> {
        let count = self.working.attempts.entry(address_id).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn clear_failed_attempts(&mut self, address_id: Uuid) -> Result<(), DomainError> {
        self.working.attempts.remove(&address_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let MockVerificationTxn { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
