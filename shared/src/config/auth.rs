//! Authentication configuration: JWT key material and cookie sessions

use serde::{Deserialize, Serialize};

/// Default directory holding the four JWT key files
pub const DEFAULT_KEY_DIR: &str = "JWT";

/// Default session signing secret (development only)
pub const DEFAULT_SESSION_SECRET: &str = "secret";

/// JWT configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Directory containing `rsa_private_key`, `cert_private_key`,
    /// `rsa_public_key` and `certificate`
    #[serde(default = "default_key_dir")]
    pub key_dir: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            key_dir: default_key_dir(),
        }
    }
}

impl JwtConfig {
    /// Create a JWT configuration reading keys from `key_dir`
    pub fn new(key_dir: impl Into<String>) -> Self {
        Self {
            key_dir: key_dir.into(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Secret used to sign session cookies
    pub secret: String,

    /// Cookie name of the typed session
    pub cookie_name: String,

    /// Cookie name of the raw session
    pub raw_cookie_name: String,

    /// Idle timeout in seconds
    pub timeout: u64,

    /// Session cookie secure flag (HTTPS only)
    pub secure: bool,

    /// Session cookie HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SESSION_SECRET),
            cookie_name: String::from("starter-session"),
            raw_cookie_name: String::from("Raw-cookie"),
            timeout: 3600, // 1 hour
            secure: false,
            http_only: default_http_only(),
        }
    }
}

impl SessionConfig {
    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SESSION_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = SessionConfig::default();
        let key_dir = std::env::var("JWT_KEY_DIR").unwrap_or_else(|_| default_key_dir());
        let timeout = std::env::var("SESSION_TIMEOUT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.timeout);

        Self {
            jwt: JwtConfig { key_dir },
            session: SessionConfig {
                secret: std::env::var("SESSION_SECRET").unwrap_or(defaults.secret),
                cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
                raw_cookie_name: std::env::var("RAW_SESSION_COOKIE_NAME")
                    .unwrap_or(defaults.raw_cookie_name),
                timeout,
                secure: std::env::var("SESSION_COOKIE_SECURE")
                    .map(|value| value == "true")
                    .unwrap_or(defaults.secure),
                http_only: defaults.http_only,
            },
        }
    }
}

fn default_key_dir() -> String {
    String::from(DEFAULT_KEY_DIR)
}

fn default_http_only() -> bool {
    true
}
