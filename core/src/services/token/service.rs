//! Main token service implementation

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Header, Validation};

use crate::domain::entities::token::{
    numeric_date, SignedToken, TokenClaims, TokenHeader, JWT_ALGORITHM, NUMERIC_DATE_RESOLUTION,
    TOKEN_TTL_SECONDS,
};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::key_manager::KeyResolver;

/// Authorization scheme accepted by [`TokenService::verify`]
pub const BEARER_SCHEME: &str = "Bearer";

/// Issues, verifies and refreshes RS256-signed tokens.
///
/// The service holds only immutable key material, so one instance can be
/// shared by every request handler. Operations are generic over the claims
/// schema; any [`TokenClaims`] implementation can be issued and verified.
#[derive(Debug, Clone)]
pub struct TokenService {
    keys: KeyResolver,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service over already loaded keys
    pub fn new(keys: KeyResolver) -> Self {
        // Time-based claims are checked separately so that expired tokens are
        // reported differently from tampered ones.
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self { keys, validation }
    }

    /// Loads the key files named by `config` and creates the service
    ///
    /// # Returns
    ///
    /// * `Ok(TokenService)` - Keys loaded successfully
    /// * `Err(TokenError::KeyLoadError)` - A key file is missing or invalid
    pub fn from_config(config: &TokenServiceConfig) -> Result<Self, TokenError> {
        KeyResolver::load(&config.key_dir).map(Self::new)
    }

    pub fn keys(&self) -> &KeyResolver {
        &self.keys
    }

    /// Signs `claims` with `iat` = now and `exp` = now + 300 seconds.
    ///
    /// Any `iat`/`exp` already present on `claims` are overwritten.
    ///
    /// # Errors
    ///
    /// * `TokenError::UnknownKeyId` - The claims' key id is empty or not configured
    /// * `TokenError::TokenGenerationFailed` - Signing failed
    pub fn issue<C: TokenClaims>(&self, claims: &C) -> Result<SignedToken<C>, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Same as [`issue`](Self::issue) with an explicit current time
    pub fn issue_at<C: TokenClaims>(
        &self,
        claims: &C,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<C>, TokenError> {
        let kid = claims.key_id();
        let issued_at = numeric_date(now);
        let stamped = claims.with_validity(issued_at, issued_at + TOKEN_TTL_SECONDS);

        let token = self.sign(kid, stamped)?;
        tracing::debug!(kid, sub = token.claims().subject(), "issued JWT");
        Ok(token)
    }

    /// Verifies the raw value of an `Authorization` header.
    ///
    /// The header must be exactly `Bearer <token>`. The token's signature is
    /// checked against the verification key named by its `kid` header, then
    /// its time-based claims are validated.
    ///
    /// # Errors
    ///
    /// Scheme, structure, key id and signature failures reject as
    /// unauthorized; expired, future-issued or not-yet-valid tokens reject
    /// as bad requests. See [`TokenError::rejection`].
    pub fn verify<C: TokenClaims>(&self, authorization: &str) -> Result<SignedToken<C>, TokenError> {
        self.verify_at(authorization, Utc::now())
    }

    /// Same as [`verify`](Self::verify) with an explicit current time
    pub fn verify_at<C: TokenClaims>(
        &self,
        authorization: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<C>, TokenError> {
        let credential = bearer_credential(authorization)?;
        let token = self.decode::<C>(credential)?;
        validate_claims(token.claims(), now)?;

        tracing::debug!(kid = %token.header().kid, "verified JWT successfully");
        Ok(token)
    }

    /// Decodes a compact token and checks its signature, ignoring time claims
    pub fn decode<C: TokenClaims>(&self, compact: &str) -> Result<SignedToken<C>, TokenError> {
        let header = decode_header(compact).map_err(|e| TokenError::InvalidTokenFormat {
            message: e.to_string(),
        })?;
        let kid = header.kid.ok_or(TokenError::MissingKeyId)?;
        let key = self
            .keys
            .verification_key(&kid)
            .map_err(|_| TokenError::UnverifiableKeyId { kid: kid.clone() })?;

        let data = decode::<C>(compact, key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::InvalidTokenFormat {
                message: e.to_string(),
            },
        })?;

        Ok(SignedToken::new(
            TokenHeader {
                kid,
                alg: data.header.alg,
            },
            data.claims,
            compact.to_string(),
        ))
    }

    /// Re-stamps the time claims of an already verified token and signs the
    /// result with the same key id. The original token is left untouched.
    ///
    /// The new `iat` is always strictly later than the original one, even
    /// when the refresh happens within the millisecond the token was issued.
    pub fn refresh<C: TokenClaims>(&self, token: &SignedToken<C>) -> Result<SignedToken<C>, TokenError> {
        self.refresh_at(token, Utc::now())
    }

    /// Same as [`refresh`](Self::refresh) with an explicit current time
    pub fn refresh_at<C: TokenClaims>(
        &self,
        token: &SignedToken<C>,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<C>, TokenError> {
        let kid = token.header().kid.as_str();
        let now = numeric_date(now);
        let issued_at = match token.claims().issued_at() {
            Some(previous) if previous >= now => previous + NUMERIC_DATE_RESOLUTION,
            _ => now,
        };
        let claims = token
            .claims()
            .with_validity(issued_at, issued_at + TOKEN_TTL_SECONDS);

        let refreshed = self.sign(kid, claims)?;
        tracing::debug!(kid, sub = refreshed.claims().subject(), "refreshed JWT");
        Ok(refreshed)
    }

    fn sign<C: TokenClaims>(&self, kid: &str, claims: C) -> Result<SignedToken<C>, TokenError> {
        let key = self.keys.signing_key(kid)?;

        let mut header = Header::new(JWT_ALGORITHM);
        header.kid = Some(kid.to_string());

        let compact = encode(&header, &claims, key).map_err(|e| TokenError::TokenGenerationFailed {
            message: e.to_string(),
        })?;

        Ok(SignedToken::new(TokenHeader::new(kid), claims, compact))
    }
}

/// Extracts the credential from `Bearer <token>`.
///
/// The header must split on single spaces into exactly two components and
/// the scheme must match literally.
pub fn bearer_credential(authorization: &str) -> Result<&str, TokenError> {
    let components: Vec<&str> = authorization.split(' ').collect();
    match components.as_slice() {
        [scheme, credential] if *scheme == BEARER_SCHEME && !credential.is_empty() => {
            Ok(credential)
        }
        _ => Err(TokenError::InvalidAuthorizationHeader),
    }
}

/// Validates the time-based claims of a decoded token at `now`
pub fn validate_claims<C: TokenClaims>(claims: &C, now: DateTime<Utc>) -> Result<(), TokenError> {
    let now = numeric_date(now);

    if let Some(exp) = claims.expires_at() {
        if now >= exp {
            return Err(TokenError::TokenExpired);
        }
    }
    if let Some(nbf) = claims.not_before() {
        if nbf > now {
            return Err(TokenError::TokenNotYetValid);
        }
    }
    if let Some(iat) = claims.issued_at() {
        if iat > now {
            return Err(TokenError::IssuedInFuture);
        }
    }

    Ok(())
}
