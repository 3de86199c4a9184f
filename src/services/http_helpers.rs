use actix_web::{http::header::ContentDisposition, HttpResponse};

use super::extraction_service::PDF_CONTENT_TYPE;

/// Creates a success JSON response
pub fn success_json<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

/// Creates a PDF download response with the given file name
pub fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(PDF_CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(filename))
        .body(bytes)
}
