use actix_web::{http::StatusCode, HttpRequest, HttpResponse};

use sk_core::domain::entities::TokenDetails;

use crate::middleware::auth::AuthenticatedToken;

use super::token_response;

/// Handler for GET /jwt/protected
///
/// Only reachable through [`JwtAuth`](crate::middleware::auth::JwtAuth);
/// echoes the verified token back to the caller.
pub async fn protected(req: HttpRequest, token: AuthenticatedToken<TokenDetails>) -> HttpResponse {
    token_response(&req, StatusCode::OK, &token.0)
}
