use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::{app_state::AppState, auth::Session, errors::AppError};

/// The raw bearer token of the current request, kept for sign-out.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok((session, token)) => {
                    req.extensions_mut().insert(session);
                    req.extensions_mut().insert(BearerToken(token));

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<(Session, String), AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("App state not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))?;

    let session = state.identity.current_session(&token).await.map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    Ok((session, token))
}

/// Extractor for the signed-in user in handlers.
pub struct AuthenticatedUser {
    pub session: Session,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.session.user_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let extensions = req.extensions();
        let user = match (extensions.get::<Session>(), extensions.get::<BearerToken>()) {
            (Some(session), Some(token)) => Ok(AuthenticatedUser {
                session: session.clone(),
                token: token.0.clone(),
            }),
            _ => Err(AppError::Unauthorized("Not authenticated".to_string())),
        };

        ready(user)
    }
}
