//! MySQL implementation of the verification store.
//!
//! Tables: `users`, `email_addresses`, `email_confirmations`, and
//! `verification_attempts` (one counter row per address). All ids are
//! CHAR(36) UUID strings. Every read that feeds a verify decision runs
//! `SELECT ... FOR UPDATE` inside the wrapping transaction, so concurrent
//! verifications of the same address serialize on the row locks and a
//! dropped transaction releases them with a rollback.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use mp_core::domain::entities::{EmailAddress, EmailConfirmation, User};
use mp_core::errors::DomainError;
use mp_core::repositories::{VerificationStore, VerificationTxn};

/// MySQL implementation of `VerificationStore`
pub struct MySqlVerificationStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationStore {
    /// Create a new MySQL verification store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationStore for MySqlVerificationStore {
    async fn begin(&self) -> Result<Box<dyn VerificationTxn>, DomainError> {
        let txn = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("begin transaction", e))?;
        Ok(Box::new(MySqlVerificationTxn { txn }))
    }
}

/// One open MySQL transaction holding the row locks
pub struct MySqlVerificationTxn {
    txn: Transaction<'static, MySql>,
}

fn database_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Database {
        message: format!("{}: {}", context, e),
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| database_error("invalid UUID in row", e))
}

fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| database_error("read users.id", e))?;

    Ok(User {
        id: parse_uuid(&id)?,
        email: row
            .try_get("email")
            .map_err(|e| database_error("read users.email", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| database_error("read users.created_at", e))?,
    })
}

fn row_to_address(row: &MySqlRow) -> Result<EmailAddress, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| database_error("read email_addresses.id", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| database_error("read email_addresses.user_id", e))?;

    Ok(EmailAddress {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        email: row
            .try_get("email")
            .map_err(|e| database_error("read email_addresses.email", e))?,
        is_verified: row
            .try_get("verified")
            .map_err(|e| database_error("read email_addresses.verified", e))?,
        is_primary: row
            .try_get("is_primary")
            .map_err(|e| database_error("read email_addresses.is_primary", e))?,
    })
}

fn row_to_confirmation(row: &MySqlRow) -> Result<EmailConfirmation, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| database_error("read email_confirmations.id", e))?;
    let address_id: String = row
        .try_get("email_address_id")
        .map_err(|e| database_error("read email_confirmations.email_address_id", e))?;

    Ok(EmailConfirmation {
        id: parse_uuid(&id)?,
        email_address_id: parse_uuid(&address_id)?,
        key: row
            .try_get("confirmation_key")
            .map_err(|e| database_error("read email_confirmations.confirmation_key", e))?,
        sent: row
            .try_get::<Option<DateTime<Utc>>, _>("sent")
            .map_err(|e| database_error("read email_confirmations.sent", e))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| database_error("read email_confirmations.created_at", e))?,
    })
}

#[async_trait]
impl VerificationTxn for MySqlVerificationTxn {
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, created_at
            FROM users
            WHERE email = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&mut *self.txn)
            .await
            .map_err(|e| database_error("find user by email", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_address(
        &mut self,
        email: &str,
        user_id: Uuid,
    ) -> Result<Option<EmailAddress>, DomainError> {
        let query = r#"
            SELECT id, user_id, email, verified, is_primary
            FROM email_addresses
            WHERE email = ? AND user_id = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .bind(user_id.to_string())
            .fetch_optional(&mut *self.txn)
            .await
            .map_err(|e| database_error("find email address", e))?;

        row.as_ref().map(row_to_address).transpose()
    }

    async fn find_address_by_id(&mut self, id: Uuid) -> Result<Option<EmailAddress>, DomainError> {
        let query = r#"
            SELECT id, user_id, email, verified, is_primary
            FROM email_addresses
            WHERE id = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&mut *self.txn)
            .await
            .map_err(|e| database_error("find email address by id", e))?;

        row.as_ref().map(row_to_address).transpose()
    }

    async fn confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<Vec<EmailConfirmation>, DomainError> {
        let query = r#"
            SELECT id, email_address_id, confirmation_key, sent, created_at
            FROM email_confirmations
            WHERE email_address_id = ?
            ORDER BY created_at
            FOR UPDATE
        "#;

        let rows = sqlx::query(query)
            .bind(address_id.to_string())
            .fetch_all(&mut *self.txn)
            .await
            .map_err(|e| database_error("list confirmations", e))?;

        rows.iter().map(row_to_confirmation).collect()
    }

    async fn find_confirmation_by_key(
        &mut self,
        key: &str,
    ) -> Result<Option<EmailConfirmation>, DomainError> {
        let query = r#"
            SELECT id, email_address_id, confirmation_key, sent, created_at
            FROM email_confirmations
            WHERE confirmation_key = ?
            LIMIT 1
            FOR UPDATE
        "#;

        let row = sqlx::query(query)
            .bind(key)
            .fetch_optional(&mut *self.txn)
            .await
            .map_err(|e| database_error("find confirmation by key", e))?;

        row.as_ref().map(row_to_confirmation).transpose()
    }

    async fn insert_confirmation(
        &mut self,
        confirmation: &EmailConfirmation,
    ) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO email_confirmations (
                id, email_address_id, confirmation_key, sent, created_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(confirmation.id.to_string())
            .bind(confirmation.email_address_id.to_string())
            .bind(&confirmation.key)
            .bind(confirmation.sent)
            .bind(confirmation.created_at)
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("insert confirmation", e))?;

        Ok(())
    }

    async fn mark_confirmation_sent(
        &mut self,
        confirmation_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE email_confirmations SET sent = ? WHERE id = ?")
            .bind(at)
            .bind(confirmation_id.to_string())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("mark confirmation sent", e))?;

        Ok(())
    }

    async fn delete_confirmation(&mut self, confirmation_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM email_confirmations WHERE id = ?")
            .bind(confirmation_id.to_string())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("delete confirmation", e))?;

        Ok(())
    }

    async fn delete_confirmations_for_address(
        &mut self,
        address_id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM email_confirmations WHERE email_address_id = ?")
            .bind(address_id.to_string())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("delete confirmations for address", e))?;

        Ok(result.rows_affected())
    }

    async fn mark_address_verified(&mut self, address_id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE email_addresses SET verified = TRUE WHERE id = ?")
            .bind(address_id.to_string())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("mark address verified", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "EmailAddress".to_string(),
            });
        }
        Ok(())
    }

    async fn record_failed_attempt(&mut self, address_id: Uuid) -> Result<i32, DomainError> {
        let row = sqlx::query(
            "SELECT failed_count FROM verification_attempts WHERE email_address_id = ? FOR UPDATE",
        )
        .bind(address_id.to_string())
        .fetch_optional(&mut *self.txn)
        .await
        .map_err(|e| database_error("read attempt counter", e))?;

        let current: i32 = match row {
            Some(row) => row
                .try_get("failed_count")
                .map_err(|e| database_error("read verification_attempts.failed_count", e))?,
            None => 0,
        };
        let next = current + 1;

        let query = r#"
            INSERT INTO verification_attempts (email_address_id, failed_count, updated_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                failed_count = VALUES(failed_count),
                updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(address_id.to_string())
            .bind(next)
            .bind(Utc::now())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("write attempt counter", e))?;

        Ok(next)
    }

    async fn clear_failed_attempts(&mut self, address_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM verification_attempts WHERE email_address_id = ?")
            .bind(address_id.to_string())
            .execute(&mut *self.txn)
            .await
            .map_err(|e| database_error("clear attempt counter", e))?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let MySqlVerificationTxn { txn } = *self;
        txn.commit()
            .await
            .map_err(|e| database_error("commit transaction", e))
    }
}
