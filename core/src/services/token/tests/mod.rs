//! Unit tests for the token service module

mod key_manager_tests;

use std::path::PathBuf;

use super::{KeyResolver, TokenService};

pub(super) const RSA_PRIVATE_KEY: &str = include_str!("../../../../../JWT/rsa_private_key");
pub(super) const RSA_PUBLIC_KEY: &str = include_str!("../../../../../JWT/rsa_public_key");
pub(super) const CERT_PRIVATE_KEY: &str = include_str!("../../../../../JWT/cert_private_key");
pub(super) const CERTIFICATE: &str = include_str!("../../../../../JWT/certificate");

/// Directory holding the development key files
pub(super) fn key_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../JWT")
}

pub(super) fn test_resolver() -> KeyResolver {
    KeyResolver::from_pem_strings(RSA_PRIVATE_KEY, RSA_PUBLIC_KEY, CERT_PRIVATE_KEY, CERTIFICATE)
        .expect("development keys should parse")
}

pub(super) fn test_service() -> TokenService {
    TokenService::new(test_resolver())
}
