//! JWT authentication middleware for protecting API endpoints.
//!
//! The middleware reads the `Authorization` header, verifies it with the
//! [`TokenService`] registered as app data and injects the verified token
//! into the request extensions. Handlers receive it through the
//! [`AuthenticatedToken`] extractor.
//!
//! Rejections follow the token error taxonomy: a missing or malformed
//! header and any signature or structural failure answer `401`, a token
//! that verifies but has expired answers `400`, and a route guarded without
//! a token service answers `500`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    marker::PhantomData,
    rc::Rc,
    task::{Context, Poll},
};

use sk_core::domain::entities::token::{SignedToken, TokenClaims};
use sk_core::errors::TokenError;
use sk_core::services::token::TokenService;

use crate::handlers::error::ApiError;

/// JWT authentication middleware factory, generic over the claims schema
pub struct JwtAuth<C> {
    _claims: PhantomData<fn() -> C>,
}

impl<C> JwtAuth<C> {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self {
            _claims: PhantomData,
        }
    }
}

impl<C> Default for JwtAuth<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B, C> Transform<S, ServiceRequest> for JwtAuth<C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    C: TokenClaims + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S, C>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            _claims: PhantomData,
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S, C> {
    service: Rc<S>,
    _claims: PhantomData<fn() -> C>,
}

impl<S, B, C> Service<ServiceRequest> for JwtAuthMiddleware<S, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    C: TokenClaims + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match authenticate::<C>(&req) {
                Ok(token) => token,
                Err(error) => {
                    let response = error.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            // Inject the verified token into request extensions
            req.extensions_mut().insert(token);

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate<C: TokenClaims>(req: &ServiceRequest) -> Result<SignedToken<C>, ApiError> {
    let token_service = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::internal("token service is not configured"))?;

    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(TokenError::InvalidAuthorizationHeader)?;

    Ok(token_service.verify::<C>(authorization)?)
}

/// Extractor for a token verified by [`JwtAuth`]
#[derive(Debug, Clone)]
pub struct AuthenticatedToken<C>(pub SignedToken<C>);

impl<C: TokenClaims + 'static> AuthenticatedToken<C> {
    pub fn into_inner(self) -> SignedToken<C> {
        self.0
    }
}

impl<C: TokenClaims + 'static> FromRequest for AuthenticatedToken<C> {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<SignedToken<C>>()
            .cloned()
            .map(AuthenticatedToken)
            .ok_or_else(|| ApiError::from(TokenError::InvalidAuthorizationHeader).into());

        ready(result)
    }
}
