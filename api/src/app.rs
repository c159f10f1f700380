//! Application factory
//!
//! Builds the Actix-web application with the route table and middleware,
//! generic over the store and mailer implementations so tests can run the
//! full HTTP surface against the in-memory mocks.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::middleware::cors::create_cors;
use crate::routes::auth::{resend_email::resend_email, verify_email::verify_email, AppState};

use mp_core::repositories::VerificationStore;
use mp_core::services::verification::MailerTrait;

/// Create and configure the application with all dependencies
pub fn create_app<St, M>(
    app_state: web::Data<AppState<St, M>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    St: VerificationStore + 'static,
    M: MailerTrait + 'static,
{
    let cors = create_cors();

    App::new()
        // Add application state
        .app_data(app_state)
        // Add middleware
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/verify-email", web::post().to(verify_email::<St, M>))
                    .route("/resend-email", web::post().to(resend_email::<St, M>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "mailproof-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
