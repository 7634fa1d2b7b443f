//! JWT route handlers
//!
//! Tokens are answered as `application/jwt` (the compact form only) when the
//! client's `Accept` header asks for it, and as a JSON [`TokenResponse`]
//! otherwise.

pub mod create_token;
pub mod protected;
pub mod refresh;

use actix_web::{
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse,
};

use sk_core::domain::entities::token::{SignedToken, TokenDetails};

use crate::dto::TokenResponse;
use crate::middleware::auth::JwtAuth;

pub use create_token::create_token;
pub use protected::protected;
pub use refresh::refresh;

/// Media type of a compact JWT
pub const APPLICATION_JWT: &str = "application/jwt";

/// Registers the JWT routes. Call only when a token service is available.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/jwt/create_token", web::post().to(create_token))
        .service(
            web::resource("/jwt/protected")
                .wrap(JwtAuth::<TokenDetails>::new())
                .route(web::get().to(protected)),
        )
        .route("/refreshJWT", web::post().to(refresh));
}

/// Whether the request's `Accept` header lists `application/jwt`
pub fn accepts_jwt(req: &HttpRequest) -> bool {
    req.headers()
        .get_all(header::ACCEPT)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| media.split(';').next().map(str::trim) == Some(APPLICATION_JWT))
}

/// Renders a token in the representation the client asked for
pub fn token_response(
    req: &HttpRequest,
    status: StatusCode,
    token: &SignedToken<TokenDetails>,
) -> HttpResponse {
    if accepts_jwt(req) {
        HttpResponse::build(status)
            .content_type(APPLICATION_JWT)
            .body(token.as_str().to_string())
    } else {
        HttpResponse::build(status).json(TokenResponse::from(token))
    }
}
