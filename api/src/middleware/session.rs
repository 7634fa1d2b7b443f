//! Cookie session middleware.
//!
//! Each client is identified by a session id carried in an HMAC-signed
//! cookie; the session data itself lives in a [`SessionStore`]. Handlers get
//! a [`Session`] handle through the extractor and mutate it in place. Once the
//! handler has produced a response the middleware persists the data, issuing
//! the cookie for sessions that did not have one yet, or drops both the
//! stored entry and the cookie if the session was purged.
//!
//! A cookie whose signature does not verify, or whose session has expired in
//! the store, is ignored and the request starts from an empty session.

use actix_web::{
    body::EitherBody,
    cookie::{Cookie, CookieJar, Key, SameSite},
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    cell::RefCell,
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use sk_core::domain::entities::SessionData;
use sk_core::repositories::SessionStore;
use sk_shared::SessionConfig;

use crate::handlers::error::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unchanged,
    Changed,
    Purged,
}

#[derive(Debug, Default)]
struct SessionInner {
    data: SessionData,
    status: SessionStatus,
}

/// Handle to the current request's session
#[derive(Debug, Clone)]
pub struct Session(Rc<RefCell<SessionInner>>);

impl Session {
    fn new(data: SessionData) -> Self {
        Self(Rc::new(RefCell::new(SessionInner {
            data,
            status: SessionStatus::Unchanged,
        })))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0.borrow().data.get(key)
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ApiError> {
        let mut inner = self.0.borrow_mut();
        inner.data.insert(key, value).map_err(serialization_error)?;
        inner.mark_changed();
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        let mut inner = self.0.borrow_mut();
        let removed = inner.data.remove(key);
        if removed.is_some() {
            inner.mark_changed();
        }
        removed
    }

    /// Reads the whole session as one struct
    pub fn state<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.0.borrow().data.to_state().map_err(serialization_error)
    }

    /// Replaces the whole session with the fields of `state`
    pub fn set_state<T: Serialize>(&self, state: &T) -> Result<(), ApiError> {
        let data = SessionData::from_state(state).map_err(serialization_error)?;
        let mut inner = self.0.borrow_mut();
        inner.data = data;
        inner.mark_changed();
        Ok(())
    }

    /// Destroys the session once the response is sent
    pub fn purge(&self) {
        let mut inner = self.0.borrow_mut();
        inner.data = SessionData::default();
        inner.status = SessionStatus::Purged;
    }

    pub fn status(&self) -> SessionStatus {
        self.0.borrow().status
    }

    fn take(&self) -> (SessionStatus, SessionData) {
        let mut inner = self.0.borrow_mut();
        (inner.status, std::mem::take(&mut inner.data))
    }
}

impl SessionInner {
    fn mark_changed(&mut self) {
        if self.status != SessionStatus::Purged {
            self.status = SessionStatus::Changed;
        }
    }
}

fn serialization_error(err: serde_json::Error) -> ApiError {
    ApiError::internal(format!("session serialization failed: {}", err))
}

impl FromRequest for Session {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<Session>()
            .cloned()
            .ok_or_else(|| ApiError::internal("session middleware is not installed").into());

        ready(result)
    }
}

struct CookieSettings<S> {
    store: Arc<S>,
    key: Key,
    name: String,
    secure: bool,
    http_only: bool,
}

impl<S> CookieSettings<S> {
    /// Session id from the request cookie, if its signature verifies
    fn session_id(&self, req: &ServiceRequest) -> Option<String> {
        let cookie = req.cookie(&self.name)?;
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        let verified = jar.signed(&self.key).get(&self.name);
        if verified.is_none() {
            log::debug!("Ignoring session cookie {} with an invalid signature", self.name);
        }
        verified.map(|cookie| cookie.value().to_string())
    }

    fn set_cookie<B>(&self, res: &mut ServiceResponse<B>, session_id: &str) -> Result<(), ApiError> {
        let mut cookie = Cookie::new(self.name.clone(), session_id.to_string());
        cookie.set_path("/");
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie.set_same_site(SameSite::Lax);

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        for signed in jar.delta() {
            res.response_mut()
                .add_cookie(signed)
                .map_err(|e| ApiError::internal(format!("invalid session cookie: {}", e)))?;
        }
        Ok(())
    }

    fn remove_cookie<B>(&self, res: &mut ServiceResponse<B>) -> Result<(), ApiError> {
        let mut cookie = Cookie::new(self.name.clone(), "");
        cookie.set_path("/");
        res.response_mut()
            .add_removal_cookie(&cookie)
            .map_err(|e| ApiError::internal(format!("invalid session cookie: {}", e)))
    }
}

/// Session middleware factory
pub struct SessionMiddleware<S> {
    settings: Rc<CookieSettings<S>>,
}

impl<S: SessionStore> SessionMiddleware<S> {
    /// Creates a middleware storing sessions in `store` under cookie `cookie_name`
    pub fn new(store: Arc<S>, key: Key, cookie_name: impl Into<String>) -> Self {
        Self {
            settings: Rc::new(CookieSettings {
                store,
                key,
                name: cookie_name.into(),
                secure: false,
                http_only: true,
            }),
        }
    }

    /// Creates a middleware using the cookie flags of `config`
    pub fn from_config(
        store: Arc<S>,
        key: Key,
        cookie_name: impl Into<String>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            settings: Rc::new(CookieSettings {
                store,
                key,
                name: cookie_name.into(),
                secure: config.secure,
                http_only: config.http_only,
            }),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.settings.name
    }
}

impl<S, B, St> Transform<S, ServiceRequest> for SessionMiddleware<St>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    St: SessionStore + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S, St>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            settings: Rc::clone(&self.settings),
        }))
    }
}

pub struct SessionMiddlewareService<S, St> {
    service: Rc<S>,
    settings: Rc<CookieSettings<St>>,
}

impl<S, B, St> Service<ServiceRequest> for SessionMiddlewareService<S, St>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    St: SessionStore + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let settings = Rc::clone(&self.settings);

        Box::pin(async move {
            let mut session_id = settings.session_id(&req);
            let data = match &session_id {
                Some(id) => match settings.store.load(id).await {
                    Ok(data) => data,
                    Err(error) => {
                        let response = ApiError::from(error).error_response();
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                },
                None => None,
            };
            if data.is_none() {
                // Unknown or expired: a new id is issued if the handler stores anything
                session_id = None;
            }

            let session = Session::new(data.unwrap_or_default());
            req.extensions_mut().insert(session.clone());

            let mut res = service.call(req).await?;

            match persist(&settings, &mut res, session_id, session.take()).await {
                Ok(()) => Ok(res.map_into_left_body()),
                Err(error) => {
                    let response = error.error_response();
                    Ok(res.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Applies the session changes made by the handler to the store and the response
async fn persist<S: SessionStore, B>(
    settings: &CookieSettings<S>,
    res: &mut ServiceResponse<B>,
    session_id: Option<String>,
    (status, data): (SessionStatus, SessionData),
) -> Result<(), ApiError> {
    match status {
        SessionStatus::Unchanged => {}
        SessionStatus::Changed => match session_id {
            Some(id) => settings.store.save(&id, data).await?,
            None => {
                let id = Uuid::new_v4().to_string();
                settings.store.save(&id, data).await?;
                settings.set_cookie(res, &id)?;
                log::debug!("Started session {}", id);
            }
        },
        SessionStatus::Purged => {
            if let Some(id) = session_id {
                settings.store.destroy(&id).await?;
                log::debug!("Destroyed session {}", id);
            }
            settings.remove_cookie(res)?;
        }
    }
    Ok(())
}
