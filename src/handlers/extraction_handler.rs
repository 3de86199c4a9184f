use actix_web::{http::header::CONTENT_TYPE, post, web, HttpRequest, HttpResponse};
use futures::StreamExt;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    context::ClientContext,
    errors::{ApiError, AppError, InputError},
    models::dto::response::ExtractedTextResponse,
    services::extraction_service::check_content_type,
};

/// Raw PDF upload. The size limit is enforced while the body streams in.
#[post("/extract")]
pub async fn extract_pdf(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: web::Payload,
    auth: AuthenticatedUser,
    ctx: ClientContext,
) -> Result<HttpResponse, ApiError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok());
    check_content_type(content_type).map_err(|e| ctx.localize(e.into()))?;

    let max_bytes = state.extraction_service.max_upload_bytes();
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            ctx.localize(AppError::InternalError(format!("Failed to read upload: {}", e)))
        })?;
        if body.len() + chunk.len() > max_bytes {
            return Err(ctx.localize(InputError::FileTooLarge { max_bytes }.into()));
        }
        body.extend_from_slice(&chunk);
    }

    log::info!(
        "[{}] Extracting {} byte upload for {}",
        ctx.request_id(),
        body.len(),
        auth.user_id()
    );

    let text = state
        .extraction_service
        .extract_text(content_type, body.to_vec())
        .await
        .map_err(|e| ctx.localize(e))?;

    Ok(HttpResponse::Ok().json(ExtractedTextResponse::new(text)))
}
