//! Application state and factory
//!
//! This module holds the shared state built at start-up and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    cookie::Key,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};

use sk_core::repositories::{GradeRepository, SessionStore};
use sk_core::services::token::TokenService;
use sk_shared::{ErrorResponse, SessionConfig};

use crate::config::session_key;
use crate::handlers::json_error_handler;
use crate::middleware::session::SessionMiddleware;
use crate::routes;

/// Shared services, cloned into every worker
pub struct AppState<G, S> {
    pub grades: Arc<G>,
    pub sessions: Arc<S>,
    pub session_config: SessionConfig,
    pub session_key: Key,
    /// `None` when the JWT keys failed to load; the JWT routes are then absent
    pub token_service: Option<Arc<TokenService>>,
}

impl<G, S> AppState<G, S> {
    pub fn new(
        grades: Arc<G>,
        sessions: Arc<S>,
        session_config: SessionConfig,
        token_service: Option<Arc<TokenService>>,
    ) -> Self {
        Self {
            grades,
            sessions,
            session_key: session_key(&session_config.secret),
            session_config,
            token_service,
        }
    }
}

impl<G, S> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            grades: Arc::clone(&self.grades),
            sessions: Arc::clone(&self.sessions),
            session_config: self.session_config.clone(),
            session_key: self.session_key.clone(),
            token_service: self.token_service.clone(),
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<G, S>(
    state: AppState<G, S>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
>
where
    G: GradeRepository + 'static,
    S: SessionStore + 'static,
{
    let typed_sessions = SessionMiddleware::from_config(
        Arc::clone(&state.sessions),
        state.session_key.clone(),
        state.session_config.cookie_name.clone(),
        &state.session_config,
    );
    let raw_sessions = SessionMiddleware::from_config(
        Arc::clone(&state.sessions),
        state.session_key.clone(),
        state.session_config.raw_cookie_name.clone(),
        &state.session_config,
    );
    let token_service = state.token_service.clone();

    App::new()
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::Data::from(Arc::clone(&state.grades)))
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        .configure(|cfg| {
            if let Some(service) = token_service {
                cfg.app_data(web::Data::from(service));
                routes::jwt::configure(cfg);
            }
        })
        .configure(routes::database::configure::<G>)
        .configure(|cfg| routes::session::configure(cfg, typed_sessions, raw_sessions))
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "starter-kit",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
