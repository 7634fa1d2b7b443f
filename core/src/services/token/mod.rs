//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Key resolution from the `kid` header to RS256 key material
//! - Token issuance with a fixed 300 second validity window
//! - Bearer credential verification
//! - Token refresh (re-stamping time claims and re-signing)

mod config;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use config::{TokenServiceConfig, DEFAULT_KEY_DIR};
pub use key_manager::{
    KeyResolver, CERTIFICATE_FILE, CERTIFICATE_KEY_ID, CERT_PRIVATE_KEY_FILE,
    RSA_KEY_ID, RSA_PRIVATE_KEY_FILE, RSA_PUBLIC_KEY_FILE,
};
pub use service::{bearer_credential, validate_claims, TokenService, BEARER_SCHEME};
