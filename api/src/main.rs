use std::sync::Arc;

use actix_web::{middleware::Logger, HttpServer};
use anyhow::Context;
use log::{error, info, warn};

use sk_api::{config, create_app, AppState};
use sk_core::repositories::GradeRepository;
use sk_core::services::token::TokenService;
use sk_infra::{DummyConnection, InMemorySessionStore, SqlGradeRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables and configuration
    let config = config::load();

    // Initialize logger
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );

    info!("Starting starter kit server ({})", config.environment);

    if config.auth.session.is_using_default_secret() {
        if config.is_production() {
            warn!("SESSION_SECRET is not set; session cookies are signed with the default secret");
        } else {
            info!("Using the default session secret");
        }
    }

    // Swap the dummy connection for a real one to use an actual database
    let grades = Arc::new(SqlGradeRepository::new(Arc::new(DummyConnection::new())));
    if let Err(e) = grades.create_table().await {
        error!("Failed to create grades table: {}", e);
    }

    let token_service = match TokenService::from_config(&config::token_service_config(&config)) {
        Ok(service) => {
            {
                let keys = service.keys();
                let key_ids: Vec<&str> = keys.key_ids().collect();
                let key_dir = keys.key_dir().map(|dir| dir.display().to_string());
                info!("Loaded JWT keys {:?} from {}", key_ids, key_dir.unwrap_or_default());
            }
            Some(Arc::new(service))
        }
        Err(e) => {
            error!("Failed to load JWT keys, JWT routes are disabled: {}", e);
            None
        }
    };

    let sessions = Arc::new(InMemorySessionStore::from_config(&config.auth.session));
    let state = AppState::new(grades, sessions, config.auth.session.clone(), token_service);

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()).wrap(Logger::default()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")
}
