//! PDF text extraction off the request threads.
//!
//! A dedicated worker thread decodes the document page by page and streams
//! [`WorkerMessage`]s back; [`PdfWorkerManager`] owns that thread and exposes a single
//! async call per document.

pub mod coordinator;
pub mod loader;
pub mod messages;
pub mod worker;

use thiserror::Error;

use crate::errors::AppError;

pub use coordinator::{ExtractionJob, JobState, PdfWorkerManager, ProgressSink};
pub use loader::{DocumentLoader, LopdfLoader, PageSource};
pub use messages::{Progress, WorkerMessage, WorkerRequest};

#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Worker not initialized")]
    NotInitialized,

    #[error("failed to spawn extraction worker: {0}")]
    Spawn(String),

    #[error("extraction worker failed to start: {0}")]
    Handshake(String),

    #[error("{0}")]
    Worker(String),

    #[error("extraction worker stopped unexpectedly")]
    WorkerGone,

    #[error("extraction was cancelled")]
    Cancelled,

    #[error("extraction timed out")]
    TimedOut,
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::TimedOut => AppError::TimedOut,
            _ => AppError::ExtractionFailed,
        }
    }
}
