//! Shared fixtures for endpoint tests

use std::sync::Arc;

use actix_web::web;
use chrono::Utc;
use uuid::Uuid;

use mp_api::routes::auth::AppState;
use mp_core::domain::entities::{EmailAddress, EmailConfirmation, User};
use mp_core::repositories::MockVerificationStore;
use mp_core::services::verification::{
    derive_code, VerificationService, VerificationServiceConfig,
};
use mp_infra::email::MockMailer;

pub const SECRET: &str = "test-secret";
pub const EMAIL: &str = "alice@example.com";

pub type TestState = web::Data<AppState<MockVerificationStore, MockMailer>>;

pub struct TestContext {
    pub state: TestState,
    pub store: Arc<MockVerificationStore>,
    pub mailer: Arc<MockMailer>,
}

fn build_state(store: &Arc<MockVerificationStore>, mailer: &Arc<MockMailer>) -> TestState {
    let config = VerificationServiceConfig {
        secret_key: SECRET.to_string(),
        ..Default::default()
    };
    let service = Arc::new(VerificationService::new(
        Arc::clone(store),
        Arc::clone(mailer),
        config,
    ));
    web::Data::new(AppState {
        verification_service: service,
    })
}

/// An app state over an empty store
pub async fn empty_context() -> TestContext {
    let store = Arc::new(MockVerificationStore::new());
    let mailer = Arc::new(MockMailer::with_options(false, false));
    let state = build_state(&store, &mailer);
    TestContext {
        state,
        store,
        mailer,
    }
}

/// An app state seeded with one user, one unverified address, and one
/// fresh confirmation. Returns (context, address id, valid code, raw key).
pub async fn seeded_context() -> (TestContext, Uuid, String, String) {
    let context = empty_context().await;

    let user = User::new(EMAIL.to_string());
    let address = EmailAddress::new_primary(user.id, EMAIL.to_string());
    let address_id = address.id;
    let mut confirmation = EmailConfirmation::new(address_id);
    confirmation.mark_sent(Utc::now());
    let code = derive_code(SECRET.as_bytes(), &confirmation.key);
    let key = confirmation.key.clone();

    context.store.insert_user(user).await;
    context.store.insert_address(address).await;
    context.store.insert_confirmation(confirmation).await;

    (context, address_id, code, key)
}
