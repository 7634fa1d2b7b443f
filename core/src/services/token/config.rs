//! Configuration for the token service

use std::path::PathBuf;

/// Default directory holding the key files, relative to the working directory
pub const DEFAULT_KEY_DIR: &str = "JWT";

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Directory containing the four key files
    pub key_dir: PathBuf,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            key_dir: PathBuf::from(DEFAULT_KEY_DIR),
        }
    }
}

impl TokenServiceConfig {
    pub fn new(key_dir: impl Into<PathBuf>) -> Self {
        Self {
            key_dir: key_dir.into(),
        }
    }

    /// Reads `JWT_KEY_DIR`, defaulting to `JWT`
    pub fn from_env() -> Self {
        std::env::var("JWT_KEY_DIR")
            .map(Self::new)
            .unwrap_or_default()
    }
}

impl From<&sk_shared::JwtConfig> for TokenServiceConfig {
    fn from(config: &sk_shared::JwtConfig) -> Self {
        Self::new(&config.key_dir)
    }
}
