//! Per-request client context.
//!
//! Screens in the client read the user's language from here instead of a global, and
//! everything downstream that renders user-facing text receives it explicitly.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::ACCEPT_LANGUAGE, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ApiError, AppError},
    middleware::get_request_id,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Picks the first supported language from an `Accept-Language` header value.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .map(|tag| tag.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .find_map(|tag| {
                if tag.starts_with("ar") {
                    Some(Language::Ar)
                } else if tag.starts_with("en") {
                    Some(Language::En)
                } else {
                    None
                }
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClientContext {
    pub language: Language,
    pub request_id: Option<String>,
}

impl ClientContext {
    pub fn localize(&self, error: AppError) -> ApiError {
        ApiError::localized(error, self.language)
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}

impl FromRequest for ClientContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let language = req
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|h| h.to_str().ok())
            .map(Language::from_accept_language)
            .unwrap_or_default();

        ready(Ok(ClientContext {
            language,
            request_id: get_request_id(req),
        }))
    }
}
