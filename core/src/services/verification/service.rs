//! Main verification service implementation

use chrono::Utc;
use std::sync::Arc;
use tracing;

use mp_shared::utils::email::{is_valid_email, mask_email};

use crate::domain::entities::EmailConfirmation;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::VerificationStore;

use super::code::derive_code;
use super::config::VerificationServiceConfig;
use super::traits::MailerTrait;
use super::types::{ConfirmationEmail, SendConfirmationResult, VerifiedEmail};

/// Verification service for proving email ownership
///
/// Every decision runs inside one store transaction whose reads lock the
/// rows they return, so two requests racing on the same address serialize:
/// at most one verify can succeed, and the loser observes the committed
/// outcome.
pub struct VerificationService<St: VerificationStore, M: MailerTrait> {
    /// Transactional store for users, addresses, and confirmations
    store: Arc<St>,
    /// Outbound mailer for confirmation emails
    mailer: Arc<M>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<St: VerificationStore, M: MailerTrait> VerificationService<St, M> {
    /// Create a new verification service
    pub fn new(store: Arc<St>, mailer: Arc<M>, config: VerificationServiceConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    /// Verify an email address with a submitted 6-digit code
    ///
    /// This method:
    /// 1. Rejects blank input before touching storage
    /// 2. Resolves the user and the address under exclusive locks
    /// 3. Scans the address's confirmations for a code match within the
    ///    expiry window
    /// 4. On a match, consumes the confirmation and marks the address
    ///    verified in the same transaction
    /// 5. On a miss, counts the failure and voids all outstanding
    ///    confirmations once the attempt limit is reached
    ///
    /// Unknown user and unknown address produce the same error kind so the
    /// endpoint cannot be used to probe which emails are registered.
    pub async fn verify_by_code(&self, email: &str, code: &str) -> DomainResult<VerifiedEmail> {
        if email.trim().is_empty() || code.trim().is_empty() {
            return Err(VerificationError::MissingInput.into());
        }

        // A malformed address cannot belong to any account; same outcome as
        // an unknown one, without the storage roundtrip
        if !is_valid_email(email) {
            return Err(VerificationError::InvalidTarget.into());
        }

        let mut txn = self.store.begin().await?;

        let user = match txn.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(
                    email = %mask_email(email),
                    event = "verify_unknown_user",
                    "Verification attempt for unknown user"
                );
                return Err(VerificationError::InvalidTarget.into());
            }
        };

        let address = match txn.find_address(email, user.id).await? {
            Some(address) => address,
            None => {
                tracing::warn!(
                    email = %mask_email(email),
                    event = "verify_unknown_address",
                    "Verification attempt for unknown email address"
                );
                return Err(VerificationError::InvalidTarget.into());
            }
        };

        if address.is_verified {
            return Err(VerificationError::AlreadyVerified.into());
        }

        let confirmations = txn.confirmations_for_address(address.id).await?;

        match self.find_valid_confirmation(&confirmations, code) {
            Some(confirmation) => {
                // Consume the challenge and flip the flag as one atomic unit
                txn.delete_confirmation(confirmation.id).await?;
                txn.mark_address_verified(address.id).await?;
                txn.clear_failed_attempts(address.id).await?;
                txn.commit().await?;

                tracing::info!(
                    email = %mask_email(email),
                    event = "email_verified",
                    "Email successfully verified with code"
                );

                Ok(VerifiedEmail {
                    email: address.email,
                    email_address_id: address.id,
                    user_id: user.id,
                })
            }
            None => {
                // The failure count must stick even though the request fails
                let attempts = txn.record_failed_attempt(address.id).await?;

                if attempts >= self.config.max_attempts {
                    let voided = txn.delete_confirmations_for_address(address.id).await?;
                    txn.commit().await?;

                    tracing::warn!(
                        email = %mask_email(email),
                        attempts = attempts,
                        voided = voided,
                        event = "verification_locked_out",
                        "Attempt limit reached, outstanding confirmations voided"
                    );
                    Err(VerificationError::TooManyAttempts.into())
                } else {
                    txn.commit().await?;

                    tracing::warn!(
                        email = %mask_email(email),
                        attempts = attempts,
                        event = "verification_code_rejected",
                        "Invalid or expired verification code submitted"
                    );
                    Err(VerificationError::InvalidOrExpiredCode.into())
                }
            }
        }
    }

    /// Verify an email address with a raw confirmation key (legacy path)
    ///
    /// Key lookups use the longer key expiry window. The HTTP boundary
    /// collapses every failure kind from this path into one generic
    /// invalid-key response.
    pub async fn verify_by_key(&self, key: &str) -> DomainResult<VerifiedEmail> {
        if key.trim().is_empty() {
            return Err(VerificationError::InvalidKey.into());
        }

        let mut txn = self.store.begin().await?;

        let confirmation = txn
            .find_confirmation_by_key(key)
            .await?
            .ok_or(VerificationError::InvalidKey)?;

        if confirmation.is_key_expired(self.config.key_expiry_days) {
            return Err(VerificationError::InvalidKey.into());
        }

        let address = txn
            .find_address_by_id(confirmation.email_address_id)
            .await?
            .ok_or(VerificationError::InvalidKey)?;

        if address.is_verified {
            return Err(VerificationError::AlreadyVerified.into());
        }

        txn.delete_confirmation(confirmation.id).await?;
        txn.mark_address_verified(address.id).await?;
        txn.clear_failed_attempts(address.id).await?;
        txn.commit().await?;

        tracing::info!(
            email = %mask_email(&address.email),
            event = "email_verified",
            "Email successfully verified with key"
        );

        Ok(VerifiedEmail {
            user_id: address.user_id,
            email_address_id: address.id,
            email: address.email,
        })
    }

    /// Issue a fresh confirmation challenge and dispatch it by email
    ///
    /// This method:
    /// 1. Resolves the user and the unverified address under locks
    /// 2. Stores a new confirmation with a fresh random key and resets the
    ///    failure counter (a new challenge voids any lockout)
    /// 3. Dispatches the email carrying the derived code, the raw key, and
    ///    the activation link
    /// 4. Stamps the dispatch time once sending succeeded; a challenge that
    ///    was never dispatched stays unredeemable
    pub async fn send_confirmation(&self, email: &str) -> DomainResult<SendConfirmationResult> {
        if email.trim().is_empty() || !is_valid_email(email) {
            return Err(VerificationError::InvalidTarget.into());
        }

        let mut txn = self.store.begin().await?;

        let user = txn
            .find_user_by_email(email)
            .await?
            .ok_or(VerificationError::InvalidTarget)?;
        let address = txn
            .find_address(email, user.id)
            .await?
            .ok_or(VerificationError::InvalidTarget)?;

        if address.is_verified {
            return Err(VerificationError::AlreadyVerified.into());
        }

        let mut confirmation = EmailConfirmation::new(address.id);
        txn.insert_confirmation(&confirmation).await?;
        txn.clear_failed_attempts(address.id).await?;
        txn.commit().await?;

        let code = derive_code(self.config.secret_key.as_bytes(), &confirmation.key);
        let activate_url = format!(
            "{}/{}",
            self.config.activation_url_base.trim_end_matches('/'),
            confirmation.key
        );
        let message = ConfirmationEmail {
            code,
            key: confirmation.key.clone(),
            activate_url,
        };

        let message_id = self
            .mailer
            .send_confirmation_email(email, &message)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(email),
                    error = %e,
                    event = "confirmation_mail_failed",
                    "Failed to dispatch confirmation email"
                );
                DomainError::Mail {
                    message: format!("Failed to send confirmation email: {}", e),
                }
            })?;

        let sent_at = Utc::now();
        let mut txn = self.store.begin().await?;
        txn.mark_confirmation_sent(confirmation.id, sent_at).await?;
        txn.commit().await?;
        confirmation.mark_sent(sent_at);

        tracing::info!(
            email = %mask_email(email),
            message_id = %message_id,
            event = "confirmation_sent",
            "Confirmation email dispatched"
        );

        Ok(SendConfirmationResult {
            confirmation,
            message_id,
        })
    }

    /// Scan confirmations in stored order for a valid, unexpired code match
    ///
    /// A record whose derived code matches but whose window has closed does
    /// not stop the scan; a later record may still match validly.
    fn find_valid_confirmation<'a>(
        &self,
        confirmations: &'a [EmailConfirmation],
        code: &str,
    ) -> Option<&'a EmailConfirmation> {
        for confirmation in confirmations {
            let expected = derive_code(self.config.secret_key.as_bytes(), &confirmation.key);
            if expected != code {
                continue;
            }
            if confirmation.is_code_expired(self.config.code_expiry_minutes) {
                tracing::info!(
                    confirmation_id = %confirmation.id,
                    event = "expired_confirmation_match",
                    "Matching but expired confirmation skipped"
                );
                continue;
            }
            return Some(confirmation);
        }
        None
    }
}
