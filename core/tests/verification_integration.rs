//! Integration tests for the verification flow through the crate's public API

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use mp_core::domain::entities::{EmailAddress, User};
    use mp_core::errors::{DomainError, VerificationError};
    use mp_core::repositories::{MockVerificationStore, VerificationStore, VerificationTxn};
    use mp_core::services::verification::{
        derive_code, ConfirmationEmail, MailerTrait, VerificationService,
        VerificationServiceConfig,
    };

    const SECRET: &str = "integration-secret";
    const EMAIL: &str = "bob@example.com";

    // Mailer that records every dispatched message
    struct RecordingMailer {
        messages: Mutex<Vec<(String, ConfirmationEmail)>>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }

        fn last_message(&self) -> Option<ConfirmationEmail> {
            self.messages
                .lock()
                .unwrap()
                .last()
                .map(|(_, message)| message.clone())
        }
    }

    #[async_trait]
    impl MailerTrait for RecordingMailer {
        async fn send_confirmation_email(
            &self,
            to: &str,
            message: &ConfirmationEmail,
        ) -> Result<String, String> {
            let mut messages = self.messages.lock().unwrap();
            messages.push((to.to_string(), message.clone()));
            Ok(format!("it_msg_{}", messages.len()))
        }
    }

    type Service = VerificationService<MockVerificationStore, RecordingMailer>;

    async fn seeded_service() -> (Arc<Service>, Arc<MockVerificationStore>, Arc<RecordingMailer>) {
        let store = Arc::new(MockVerificationStore::new());
        let mailer = Arc::new(RecordingMailer::new());

        let user = User::new(EMAIL.to_string());
        let address = EmailAddress::new_primary(user.id, EMAIL.to_string());
        store.insert_user(user).await;
        store.insert_address(address).await;

        let config = VerificationServiceConfig {
            secret_key: SECRET.to_string(),
            ..Default::default()
        };
        let service = Arc::new(VerificationService::new(
            Arc::clone(&store),
            Arc::clone(&mailer),
            config,
        ));
        (service, store, mailer)
    }

    async fn address_is_verified(store: &MockVerificationStore) -> bool {
        // The mock exposes addresses by id only, so look the id up first
        let mut txn = store.begin().await.unwrap();
        let user = txn.find_user_by_email(EMAIL).await.unwrap().unwrap();
        let address = txn.find_address(EMAIL, user.id).await.unwrap().unwrap();
        address.is_verified
    }

    #[tokio::test]
    async fn test_full_code_flow_issue_then_verify() {
        let (service, store, mailer) = seeded_service().await;

        // Step 1: Issue a challenge; the email carries the derived code
        let sent = service.send_confirmation(EMAIL).await.unwrap();
        assert!(sent.confirmation.sent.is_some());

        let message = mailer.last_message().unwrap();
        assert_eq!(message.code.len(), 6);
        assert_eq!(
            message.code,
            derive_code(SECRET.as_bytes(), &sent.confirmation.key)
        );

        // Step 2: Submit the emailed code
        let verified = service.verify_by_code(EMAIL, &message.code).await.unwrap();
        assert_eq!(verified.email, EMAIL);
        assert!(address_is_verified(&store).await);

        // Step 3: The transition only runs once
        let replay = service.verify_by_code(EMAIL, &message.code).await;
        assert!(matches!(
            replay,
            Err(DomainError::Verification(VerificationError::AlreadyVerified))
        ));
    }

    #[tokio::test]
    async fn test_lockout_then_reissue_flow() {
        let (service, store, mailer) = seeded_service().await;

        let sent = service.send_confirmation(EMAIL).await.unwrap();
        let address_id = sent.confirmation.email_address_id;
        let good = mailer.last_message().unwrap().code;
        let bad = if good == "000000" { "111111" } else { "000000" };

        // Exhaust the attempt limit
        for attempt in 1..=5 {
            let result = service.verify_by_code(EMAIL, bad).await;
            let expected = if attempt < 5 {
                VerificationError::InvalidOrExpiredCode
            } else {
                VerificationError::TooManyAttempts
            };
            assert!(matches!(
                result,
                Err(DomainError::Verification(kind)) if kind == expected
            ));
        }

        // The lockout voided the outstanding challenge, so the previously
        // valid code is refused too
        assert!(store.confirmations_for(address_id).await.is_empty());
        let result = service.verify_by_code(EMAIL, &good).await;
        assert!(matches!(
            result,
            Err(DomainError::Verification(VerificationError::TooManyAttempts))
        ));

        // A fresh challenge lifts the lockout and its code works
        service.send_confirmation(EMAIL).await.unwrap();
        let reissued = mailer.last_message().unwrap().code;
        service.verify_by_code(EMAIL, &reissued).await.unwrap();
        assert!(address_is_verified(&store).await);
    }

    #[tokio::test]
    async fn test_full_key_flow() {
        let (service, store, mailer) = seeded_service().await;

        service.send_confirmation(EMAIL).await.unwrap();
        let message = mailer.last_message().unwrap();
        assert!(message.activate_url.ends_with(&message.key));

        let verified = service.verify_by_key(&message.key).await.unwrap();
        assert_eq!(verified.email, EMAIL);
        assert!(address_is_verified(&store).await);
    }

    #[tokio::test]
    async fn test_expired_challenge_is_refused_end_to_end() {
        let (service, store, mailer) = seeded_service().await;

        let sent = service.send_confirmation(EMAIL).await.unwrap();
        let code = mailer.last_message().unwrap().code;

        // Age the stored record past the code window but not the key window
        let mut stale = sent.confirmation.clone();
        stale.sent = Some(Utc::now() - Duration::minutes(20));
        {
            let mut txn = store.begin().await.unwrap();
            txn.delete_confirmation(sent.confirmation.id).await.unwrap();
            txn.insert_confirmation(&stale).await.unwrap();
            txn.commit().await.unwrap();
        }

        let result = service.verify_by_code(EMAIL, &code).await;
        assert!(matches!(
            result,
            Err(DomainError::Verification(VerificationError::InvalidOrExpiredCode))
        ));

        // The longer-lived key path still accepts the same record
        service.verify_by_key(&stale.key).await.unwrap();
        assert!(address_is_verified(&store).await);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_settle_on_one_winner() {
        let (service, store, mailer) = seeded_service().await;

        service.send_confirmation(EMAIL).await.unwrap();
        let code = mailer.last_message().unwrap().code;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                service.verify_by_code(EMAIL, &code).await
            }));
        }

        let mut successes = 0;
        let mut already_verified = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::Verification(VerificationError::AlreadyVerified)) => {
                    already_verified += 1
                }
                other => panic!("unexpected outcome: {:?}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(already_verified, 3);
        assert!(address_is_verified(&store).await);
    }
}
