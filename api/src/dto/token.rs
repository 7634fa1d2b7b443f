//! Token request and response payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use sk_core::domain::entities::token::{SignedToken, TokenDetails, TokenHeader};

/// Request body for `POST /jwt/create_token`
///
/// `iat` and `exp` are accepted for symmetry with the issued claims but are
/// always replaced when the token is signed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTokenRequest {
    #[validate(length(min = 1, message = "sub must not be empty"))]
    pub sub: String,

    #[validate(length(min = 1, message = "kid must not be empty"))]
    pub kid: String,

    pub favourite: i64,

    #[serde(default)]
    pub iat: Option<f64>,

    #[serde(default)]
    pub exp: Option<f64>,
}

impl CreateTokenRequest {
    pub fn into_claims(self) -> TokenDetails {
        TokenDetails::new(self.sub, self.kid, self.favourite)
    }
}

/// JSON body of `POST /refreshJWT`
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
}

/// JSON representation of a signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Compact `header.payload.signature` form
    pub token: String,
    pub header: TokenHeader,
    pub claims: TokenDetails,
}

impl From<&SignedToken<TokenDetails>> for TokenResponse {
    fn from(token: &SignedToken<TokenDetails>) -> Self {
        Self {
            token: token.as_str().to_string(),
            header: token.header().clone(),
            claims: token.claims().clone(),
        }
    }
}
