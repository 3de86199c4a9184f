use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::context::Language;

/// Problems with what the user submitted, caught before any worker or network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter some text or upload a PDF to generate a quiz")]
    EmptyText,

    #[error("Please provide at least {min} characters of text")]
    TextTooShort { min: usize },

    #[error("Please upload a PDF file")]
    NotPdf,

    #[error("File size should be less than {}MB", .max_bytes / (1024 * 1024))]
    FileTooLarge { max_bytes: usize },
}

impl InputError {
    pub fn message(&self, language: Language) -> String {
        match language {
            Language::En => self.to_string(),
            Language::Ar => match self {
                InputError::EmptyText => {
                    "الرجاء إدخال نص أو تحميل ملف PDF لإنشاء اختبار".to_string()
                }
                InputError::TextTooShort { min } => {
                    format!("يرجى توفير {} حرف على الأقل من النص", min)
                }
                InputError::NotPdf => "يرجى تحميل ملف PDF".to_string(),
                InputError::FileTooLarge { max_bytes } => format!(
                    "يجب أن يكون حجم الملف أقل من {} ميجابايت",
                    max_bytes / (1024 * 1024)
                ),
            },
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(InputError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to read PDF file. Please try again.")]
    ExtractionFailed,

    #[error("Failed to generate quiz. Please try again.")]
    GenerationFailed,

    #[error("Download failed. Please try again.")]
    ExportFailed,

    #[error("The request timed out. Please try again.")]
    TimedOut,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::ExtractionFailed => "EXTRACTION_FAILED",
            AppError::GenerationFailed => "GENERATION_FAILED",
            AppError::ExportFailed => "EXPORT_FAILED",
            AppError::TimedOut => "TIMED_OUT",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the user. Only the fixed, user-facing failures are translated.
    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (AppError::InvalidInput(input), _) => input.message(language),
            (AppError::ExtractionFailed, Language::Ar) => {
                "فشل في قراءة ملف PDF. حاول مرة اخرى.".to_string()
            }
            (AppError::GenerationFailed, Language::Ar) => {
                "فشل في إنشاء الاختبار. حاول مرة أخرى.".to_string()
            }
            (AppError::ExportFailed, Language::Ar) => "فشل التنزيل. حاول مرة أخرى.".to_string(),
            (AppError::TimedOut, Language::Ar) => "انتهت مهلة الطلب. حاول مرة أخرى.".to_string(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(InputError::FileTooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            AppError::InvalidInput(InputError::NotPdf) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ExtractionFailed => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationFailed => StatusCode::BAD_GATEWAY,
            AppError::ExportFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        render_error(self, Language::En)
    }
}

fn render_error(err: &AppError, language: Language) -> HttpResponse {
    HttpResponse::build(err.status_code()).json(ErrorResponse {
        error: err.user_message(language),
        kind: err.error_code(),
        code: err.status_code().as_u16(),
    })
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::InvalidInput(err)
    }
}

/// An [`AppError`] rendered in the caller's language.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub language: Language,
}

impl ApiError {
    pub fn localized(error: AppError, language: Language) -> Self {
        Self { error, language }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error.user_message(self.language))
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::localized(error, Language::En)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        render_error(&self.error, self.language)
    }
}

pub type AppResult<T> = Result<T, AppError>;
