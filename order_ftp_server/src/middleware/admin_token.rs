//! Bearer-token middleware for the settings API.
//!
//! Every request under `/api` must carry `Authorization: Bearer <token>`, where the token matches `OFR_ADMIN_TOKEN`.
//! If no token has been configured, the admin API is closed and every request is refused.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use ofr_common::Secret;

use crate::{
    errors::{AuthError, ServerError},
    helpers::tokens_match,
};

pub struct AdminTokenMiddlewareFactory {
    token: Option<Secret<String>>,
}

impl AdminTokenMiddlewareFactory {
    pub fn new(token: Option<Secret<String>>) -> Self {
        AdminTokenMiddlewareFactory { token }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminTokenMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = AdminTokenMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminTokenMiddlewareService { token: self.token.clone(), service: Rc::new(service) }))
    }
}

pub struct AdminTokenMiddlewareService<S> {
    token: Option<Secret<String>>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminTokenMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token = self.token.clone();
        Box::pin(async move {
            trace!("🔐️ Checking admin token for {}", req.path());
            match check_bearer_token(&req, token.as_ref()) {
                Ok(()) => {
                    trace!("🔐️ Admin token check ✅️");
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    warn!("🔐️ Denying access to {}. {e}", req.path());
                    Ok(req.error_response(ServerError::AuthenticationError(e)).map_into_right_body())
                },
            }
        })
    }
}

fn check_bearer_token(req: &ServiceRequest, expected: Option<&Secret<String>>) -> Result<(), AuthError> {
    let expected = expected.ok_or(AuthError::AdminApiDisabled)?;
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingAdminToken)?;
    if tokens_match(expected.reveal(), provided) {
        Ok(())
    } else {
        Err(AuthError::InvalidAdminToken)
    }
}
