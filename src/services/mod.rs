pub mod extraction_service;
pub mod http_helpers;
pub mod quiz_service;

pub use extraction_service::{check_content_type, check_upload, ExtractionService};
pub use quiz_service::{check_text_input, QuizService};
