//! Server configuration loading

use actix_web::cookie::Key;
use sha2::{Digest, Sha512};

use sk_core::services::token::TokenServiceConfig;
use sk_shared::AppConfig;

/// Loads `.env` (when present) and the application configuration
pub fn load() -> AppConfig {
    dotenv::dotenv().ok();
    AppConfig::from_env()
}

/// Derives the cookie signing key from the configured session secret.
///
/// Cookie keys need 64 bytes of material; the SHA-512 digest of the secret
/// provides exactly that for secrets of any length.
pub fn session_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// Token service settings derived from the application configuration
pub fn token_service_config(config: &AppConfig) -> TokenServiceConfig {
    TokenServiceConfig::from(&config.auth.jwt)
}
