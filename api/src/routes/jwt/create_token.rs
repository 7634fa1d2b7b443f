use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use validator::Validate;

use sk_core::errors::DomainError;
use sk_core::services::token::TokenService;

use crate::dto::CreateTokenRequest;
use crate::handlers::error::handle_domain_error;

use super::token_response;

/// Handler for POST /jwt/create_token
///
/// Signs the submitted claims with the key selected by `kid`, stamping
/// `iat` with the current time and `exp` five minutes later.
///
/// # Request Body
///
/// ```json
/// { "sub": "alice", "kid": "0", "favourite": 7 }
/// ```
///
/// # Errors
/// - 400 Bad Request: empty `sub`/`kid`, or a `kid` with no signing key
/// - 500 Internal Server Error: signing failed
pub async fn create_token(
    req: HttpRequest,
    token_service: web::Data<TokenService>,
    request: web::Json<CreateTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        log::warn!("Rejected create_token request: {}", errors);
        return handle_domain_error(DomainError::Validation {
            message: errors.to_string(),
        });
    }

    let claims = request.into_inner().into_claims();
    match token_service.issue(&claims) {
        Ok(token) => {
            log::info!("Issued token for {} with key {}", token.claims().sub, token.header().kid);
            token_response(&req, StatusCode::CREATED, &token)
        }
        Err(error) => handle_domain_error(error),
    }
}
