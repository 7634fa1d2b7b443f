//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Lifetime of every issued or refreshed token (5 minutes)
pub const TOKEN_TTL_SECONDS: f64 = 300.0;

/// Smallest step between two stamped NumericDate values
pub const NUMERIC_DATE_RESOLUTION: f64 = 0.001;

/// Converts a point in time to a JWT NumericDate with millisecond precision
pub fn numeric_date(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Signing algorithm used for both configured keys
pub const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Contract a claims payload must satisfy to be issued, verified and refreshed.
///
/// Timestamps are JWT NumericDate values: seconds since the Unix epoch,
/// possibly fractional.
pub trait TokenClaims: Serialize + DeserializeOwned + Clone {
    /// Subject the token was issued for
    fn subject(&self) -> &str;

    /// Key identifier selecting the signing key
    fn key_id(&self) -> &str;

    /// Issued-at timestamp, if stamped
    fn issued_at(&self) -> Option<f64>;

    /// Expiry timestamp, if stamped
    fn expires_at(&self) -> Option<f64>;

    /// Not-before timestamp; most claim schemas do not carry one
    fn not_before(&self) -> Option<f64> {
        None
    }

    /// Returns a copy of these claims with the time-based claims replaced.
    /// Every other claim must be carried over unchanged.
    fn with_validity(&self, issued_at: f64, expires_at: f64) -> Self;
}

/// Claims issued by the demo JWT routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDetails {
    /// Subject
    pub sub: String,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,

    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,

    /// Key id the token is signed with
    pub kid: String,

    /// Custom claim
    pub favourite: i64,
}

impl TokenDetails {
    /// Creates unstamped claims; `iat` and `exp` are set on issue
    pub fn new(sub: impl Into<String>, kid: impl Into<String>, favourite: i64) -> Self {
        Self {
            sub: sub.into(),
            iat: None,
            exp: None,
            kid: kid.into(),
            favourite,
        }
    }
}

impl TokenClaims for TokenDetails {
    fn subject(&self) -> &str {
        &self.sub
    }

    fn key_id(&self) -> &str {
        &self.kid
    }

    fn issued_at(&self) -> Option<f64> {
        self.iat
    }

    fn expires_at(&self) -> Option<f64> {
        self.exp
    }

    fn with_validity(&self, issued_at: f64, expires_at: f64) -> Self {
        Self {
            iat: Some(issued_at),
            exp: Some(expires_at),
            ..self.clone()
        }
    }
}

/// JOSE header fields the service cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Key id the token was signed with
    pub kid: String,
    /// Signing algorithm
    pub alg: Algorithm,
}

impl TokenHeader {
    pub fn new(kid: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            alg: JWT_ALGORITHM,
        }
    }
}

/// A signed token: header, claims and the compact `header.payload.signature` form.
///
/// Values are never mutated; refreshing produces a new `SignedToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken<C> {
    header: TokenHeader,
    claims: C,
    compact: String,
}

impl<C: TokenClaims> SignedToken<C> {
    pub(crate) fn new(header: TokenHeader, claims: C, compact: String) -> Self {
        Self {
            header,
            claims,
            compact,
        }
    }

    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// The compact serialization sent over the wire
    pub fn as_str(&self) -> &str {
        &self.compact
    }

    pub fn into_claims(self) -> C {
        self.claims
    }
}

impl<C> std::fmt::Display for SignedToken<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.compact)
    }
}
