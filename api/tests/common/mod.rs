//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;

use sk_api::AppState;
use sk_core::services::token::{TokenService, TokenServiceConfig};
use sk_infra::{DummyConnection, InMemorySessionStore, SqlGradeRepository};
use sk_shared::SessionConfig;

pub type TestState = AppState<SqlGradeRepository<DummyConnection>, InMemorySessionStore>;

/// Token service over the development keys in the workspace `JWT` directory
pub fn token_service() -> Arc<TokenService> {
    let key_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../JWT");
    Arc::new(
        TokenService::from_config(&TokenServiceConfig::new(key_dir))
            .expect("development keys should load"),
    )
}

fn build_state(token_service: Option<Arc<TokenService>>) -> TestState {
    AppState::new(
        Arc::new(SqlGradeRepository::new(Arc::new(DummyConnection::new()))),
        Arc::new(InMemorySessionStore::default()),
        SessionConfig::default(),
        token_service,
    )
}

/// Application state with JWT routes enabled
pub fn state() -> TestState {
    build_state(Some(token_service()))
}

/// Application state as if the key files failed to load
pub fn state_without_keys() -> TestState {
    build_state(None)
}

/// The cookie named `name` set by a response, if any
pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}
