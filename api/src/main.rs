use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use mp_api::app::create_app;
use mp_api::routes::auth::AppState;
use mp_core::services::verification::{MailerTrait, VerificationService};
use mp_infra::database::{DatabasePool, MySqlVerificationStore};
use mp_infra::email::{MockMailer, SmtpMailer};
use mp_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting MailProof API server");

    let config = AppConfig::from_env();
    if config.verification.is_using_default_secret() {
        log::warn!("SECRET_KEY is not set; verification codes use the default secret");
    }

    // Database pool and store
    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(to_io_error)?;
    pool.health_check().await.map_err(to_io_error)?;
    let store = Arc::new(MySqlVerificationStore::new(pool.get_pool().clone()));

    // Outbound mailer: real SMTP relay, or the console mock for development
    if config.mail.use_mock_mailer {
        info!("Using mock mailer; confirmation emails print to the console");
        let mailer = Arc::new(MockMailer::new());
        run_server(config, store, mailer).await
    } else {
        let mailer = Arc::new(SmtpMailer::new(&config.mail).map_err(to_io_error)?);
        run_server(config, store, mailer).await
    }
}

async fn run_server<M>(
    config: AppConfig,
    store: Arc<MySqlVerificationStore>,
    mailer: Arc<M>,
) -> std::io::Result<()>
where
    M: MailerTrait + 'static,
{
    let verification_service = Arc::new(VerificationService::new(
        store,
        mailer,
        config.verification.clone().into(),
    ));
    let app_state = web::Data::new(AppState {
        verification_service,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}

fn to_io_error(error: mp_infra::InfrastructureError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}
