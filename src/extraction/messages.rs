/// Requests accepted by the extraction worker.
#[derive(Debug)]
pub enum WorkerRequest {
    /// The buffer is moved into the worker; the caller keeps no copy.
    LoadPdf { bytes: Vec<u8>, max_pages: usize },
}

/// Everything the worker reports back, in the order it happens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerMessage {
    Ready,
    Status(String),
    Progress { current: usize, total: usize },
    Complete(String),
    Error(String),
}

impl WorkerMessage {
    /// `Complete` and `Error` end a job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerMessage::Complete(_) | WorkerMessage::Error(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}
