pub mod auth_handler;
pub mod extraction_handler;
pub mod quiz_handler;

use actix_web::{get, web, HttpResponse};

use crate::auth::AuthMiddleware;

pub use auth_handler::{current_session, sign_out};
pub use extraction_handler::extract_pdf;
pub use quiz_handler::{
    create_quiz, discard_quiz, export_result, get_quiz, next_question, previous_question,
    quiz_result, select_answer,
};

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Registers every route. Everything except `/health` sits behind [`AuthMiddleware`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(
            web::scope("/auth")
                .wrap(AuthMiddleware)
                .service(current_session)
                .service(sign_out),
        )
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(extract_pdf)
                .service(create_quiz)
                .service(get_quiz)
                .service(select_answer)
                .service(next_question)
                .service(previous_question)
                .service(quiz_result)
                .service(export_result)
                .service(discard_quiz),
        );
}
