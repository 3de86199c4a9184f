use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    context::ClientContext,
    errors::ApiError,
    export::EXPORT_FILENAME,
    models::dto::{
        request::{GenerateQuizRequest, SelectAnswerRequest},
        response::MessageResponse,
    },
    services::http_helpers::{pdf_attachment, success_json},
};

#[post("/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let attempt = state
        .quiz_service
        .start_quiz(&auth.session, request.into_inner())
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(HttpResponse::Created().json(attempt))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let attempt = state
        .quiz_service
        .get_attempt(&auth.session, &id)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(attempt))
}

#[post("/quizzes/{id}/answer")]
pub async fn select_answer(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SelectAnswerRequest>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let attempt = state
        .quiz_service
        .select_answer(&auth.session, &id, request.option_index)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(attempt))
}

#[post("/quizzes/{id}/next")]
pub async fn next_question(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let response = state
        .quiz_service
        .next(&auth.session, &id)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(response))
}

#[post("/quizzes/{id}/previous")]
pub async fn previous_question(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let response = state
        .quiz_service
        .previous(&auth.session, &id)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(response))
}

#[get("/quizzes/{id}/result")]
pub async fn quiz_result(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let result = state
        .quiz_service
        .result(&auth.session, &id, ctx.language)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(result))
}

#[get("/quizzes/{id}/export")]
pub async fn export_result(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let bytes = state
        .quiz_service
        .export(&auth.session, &id)
        .await
        .map_err(|e| ctx.localize(e))?;
    log::debug!("[{}] Exported {} bytes", ctx.request_id(), bytes.len());
    Ok(pdf_attachment(EXPORT_FILENAME, bytes))
}

#[delete("/quizzes/{id}")]
pub async fn discard_quiz(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    state
        .quiz_service
        .discard(&auth.session, &id)
        .await
        .map_err(|e| ctx.localize(e))?;
    Ok(success_json(MessageResponse {
        message: "Quiz discarded".to_string(),
    }))
}
