use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, context::ClientContext, errors::ApiError,
    models::dto::response::MessageResponse,
};

#[get("/session")]
pub async fn current_session(auth: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(auth.session)
}

/// Revokes the bearer token. Active quiz attempts are cleared by the sign-out listener.
#[post("/sign-out")]
pub async fn sign_out(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    state
        .identity
        .sign_out(&auth.token)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Signed out".to_string(),
    }))
}
