use actix_web::{http::header, http::StatusCode, web, HttpRequest, HttpResponse};
use chrono::Utc;

use sk_core::domain::entities::TokenDetails;
use sk_core::errors::{DomainError, TokenError};
use sk_core::services::token::{validate_claims, TokenService};

use crate::dto::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

use super::token_response;

/// Handler for POST /refreshJWT
///
/// Accepts the compact token either as the raw body (`application/jwt` or
/// text) or as JSON `{"token": "..."}`. The token must still be valid: its
/// signature is verified and its time claims checked before a fresh token
/// with renewed `iat`/`exp` is signed with the same key.
///
/// # Errors
/// - 400 Bad Request: unreadable body, or the token has expired
/// - 401 Unauthorized: signature or structural failure
pub async fn refresh(
    req: HttpRequest,
    token_service: web::Data<TokenService>,
    body: web::Bytes,
) -> HttpResponse {
    let compact = match compact_token(&req, &body) {
        Ok(compact) => compact,
        Err(error) => return handle_domain_error(error),
    };

    let result = token_service
        .decode::<TokenDetails>(&compact)
        .and_then(|token| validate_claims(token.claims(), Utc::now()).map(|_| token))
        .and_then(|token| token_service.refresh(&token));

    match result {
        Ok(token) => {
            log::info!("Refreshed token for {}", token.claims().sub);
            token_response(&req, StatusCode::CREATED, &token)
        }
        Err(error) => handle_domain_error(error),
    }
}

fn compact_token(req: &HttpRequest, body: &[u8]) -> Result<String, DomainError> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    let compact = if is_json {
        serde_json::from_slice::<RefreshTokenRequest>(body)
            .map_err(|e| DomainError::Validation {
                message: format!("invalid refresh request: {}", e),
            })?
            .token
    } else {
        std::str::from_utf8(body)
            .map_err(|_| DomainError::Validation {
                message: "token must be UTF-8 text".to_string(),
            })?
            .to_string()
    };

    let compact = compact.trim();
    if compact.is_empty() {
        return Err(TokenError::InvalidTokenFormat {
            message: "empty token".to_string(),
        }
        .into());
    }
    Ok(compact.to_string())
}
