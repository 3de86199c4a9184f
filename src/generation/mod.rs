//! Quiz generation: prompt construction, the completion call and response validation.

pub mod backend;
pub mod client;
pub mod fence;
pub mod parse;
pub mod prompt;

use thiserror::Error;

use crate::errors::AppError;

pub use backend::{CompletionBackend, HttpCompletionBackend};
pub use client::QuizGenerator;
pub use fence::strip_code_fence;
pub use parse::parse_questions;
pub use prompt::{build_quiz_prompt, GenerationProfile};

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("no text to generate from")]
    EmptyInput,

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion endpoint returned status {0}")]
    Status(u16),

    #[error("No content in response")]
    NoContent,

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("response is not valid JSON: {0}")]
    Parse(String),

    #[error("completion request timed out")]
    TimedOut,
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::TimedOut => AppError::TimedOut,
            _ => AppError::GenerationFailed,
        }
    }
}
