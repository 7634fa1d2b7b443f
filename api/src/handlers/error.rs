use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use sk_core::errors::{DomainError, Rejection, TokenError};
use sk_shared::ErrorResponse;
use thiserror::Error;

/// Error type returned by extractors and middleware.
///
/// Wraps a [`DomainError`] and renders it as an [`ErrorResponse`] with the
/// status derived from the error's [`Rejection`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] DomainError);

impl ApiError {
    pub fn domain(&self) -> &DomainError {
        &self.0
    }

    /// Internal failure with a message that is logged but never sent to the client
    pub fn internal(message: impl Into<String>) -> Self {
        Self(DomainError::Internal {
            message: message.into(),
        })
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self(DomainError::Token(err))
    }
}

/// Maps a rejection class to its HTTP status
pub fn status_for(rejection: Rejection) -> StatusCode {
    match rejection {
        Rejection::BadRequest => StatusCode::BAD_REQUEST,
        Rejection::Unauthorized => StatusCode::UNAUTHORIZED,
        Rejection::NotFound => StatusCode::NOT_FOUND,
        Rejection::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Token(token_error) if token_error.rejection() != Rejection::Internal => {
            ErrorResponse::new(token_error.code(), token_error.to_string())
        }
        DomainError::Validation { message } => ErrorResponse::new("validation_error", message),
        DomainError::NotFound { resource } => {
            ErrorResponse::new("not_found", format!("{} was not found", resource))
        }
        // Internal details stay in the log
        _ => ErrorResponse::new("internal_error", "An internal error occurred"),
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.rejection())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        } else {
            log::debug!("Request rejected: {}", self.0);
        }
        HttpResponse::build(status).json(error_body(&self.0))
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: impl Into<DomainError>) -> HttpResponse {
    ApiError(error.into()).error_response()
}

/// `JsonConfig` error handler rendering unreadable JSON bodies as validation errors
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON body for {}: {}", req.path(), err);
    ApiError(DomainError::Validation {
        message: err.to_string(),
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_token_errors_keep_their_status() {
        let response = handle_domain_error(TokenError::TokenExpired);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "token_expired");

        let response = handle_domain_error(TokenError::InvalidSignature);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_internal_errors_are_masked() {
        let response = handle_domain_error(DomainError::Database {
            message: "connection refused on 10.0.0.3".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");

        let response = handle_domain_error(TokenError::KeyLoadError {
            path: "JWT/certificate".to_string(),
            message: "missing".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "internal_error");
    }

    #[actix_web::test]
    async fn test_validation_error_body() {
        let response = handle_domain_error(DomainError::Validation {
            message: "sub must not be empty".to_string(),
        });
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "sub must not be empty");
    }
}
