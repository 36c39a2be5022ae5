//! HTTP middleware for the forum service.
//!
//! Session resolution: the bearer token is looked up with the identity
//! provider and the matching forum profile is fetched from the store, then
//! stored in request extensions as [`CurrentUser`]. Identity is explicit
//! per-request context; there is no process-global session state.

use crate::app_state::AppState;
use crate::error::AppError;
use crate::services::UserService;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Identity context resolved for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub handle: String,
    pub uid: String,
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
}

/// Actix middleware that resolves the `Authorization: Bearer` token into a
/// [`CurrentUser`] before the route runs.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or_else(|| AppError::Unauthenticated("missing bearer token".into()))?
                .to_string();

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::RemoteStore("application state missing".into()))?;

            let current = UserService::new(state.store.clone(), state.identity.clone())
                .resolve_session(&token)
                .await
                .map_err(|err| {
                    tracing::debug!("session resolution failed: {}", err);
                    err
                })?;

            req.extensions_mut().insert(current);

            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Unauthenticated("session context missing".into()).into()
                }),
        )
    }
}
