use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpMessage};

use crate::context::UserInfo;
use crate::core::models::user::Claim;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::impls::tokener::jwt::JWT;

static BEARER: &str = "Bearer ";

/// Rejects requests without a valid token and stores the caller's id as `UserInfo`.
pub struct JWTMiddleware {
    tokener: JWT,
}

impl JWTMiddleware {
    pub fn new(tokener: JWT) -> Self {
        Self { tokener }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let tokener = self.tokener.clone();
        Box::pin(async move {
            Ok(JWTService {
                tokener: Rc::new(tokener),
                next_service: service,
            })
        })
    }
}

pub struct JWTService<S> {
    tokener: Rc<JWT>,
    next_service: S,
}

impl<S> JWTService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<i32, Error> {
        let header = req.headers().get("Authorization").ok_or_else(|| ErrorUnauthorized("no token in header"))?;
        let value = header.to_str().map_err(ErrorUnauthorized)?;
        let token = value.strip_prefix(BEARER).unwrap_or(value);
        let claim = <JWT as Tokener<Claim>>::verify_token(&self.tokener, token).map_err(ErrorUnauthorized)?;
        claim.user().parse::<i32>().map_err(ErrorUnauthorized)
    }
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Err(e) => {
                log::debug!("rejecting {} {}: {}", req.method(), req.path(), e);
                Box::pin(async move { Err(e) })
            }
            Ok(id) => {
                req.extensions_mut().insert(UserInfo { id });
                let res_fut = self.next_service.call(req);
                Box::pin(async move {
                    let resp = res_fut.await.map_err(|e| e.into())?;
                    Ok(resp)
                })
            }
        }
    }
}
