use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch, Mutex};

use super::{
    loader::DocumentLoader,
    messages::{Progress, WorkerMessage, WorkerRequest},
    worker::{self, WorkerHandle},
    ExtractionError,
};

/// Receives page progress while a PDF is being read.
pub type ProgressSink = mpsc::UnboundedSender<Progress>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

/// Book-keeping for the one PDF currently being read.
#[derive(Debug)]
pub struct ExtractionJob {
    page_limit: usize,
    state: JobState,
    text: String,
    last_error: Option<String>,
    page_errors: Vec<String>,
    progress: Option<Progress>,
}

impl ExtractionJob {
    pub fn new(page_limit: usize) -> Self {
        Self {
            page_limit,
            state: JobState::Queued,
            text: String::new(),
            last_error: None,
            page_errors: Vec::new(),
            progress: None,
        }
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn page_errors(&self) -> &[String] {
        &self.page_errors
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Feeds one worker message into the job. Returns `true` once the job is finished.
    pub fn apply(&mut self, message: WorkerMessage, sink: Option<&ProgressSink>) -> bool {
        match message {
            WorkerMessage::Ready => false,
            WorkerMessage::Status(status) => {
                if status.starts_with("Error processing page") {
                    log::warn!("{}", status);
                    self.page_errors.push(status);
                } else {
                    log::debug!("[worker] {}", status);
                }
                false
            }
            WorkerMessage::Progress { current, total } => {
                let progress = Progress { current, total };
                self.progress = Some(progress);
                if let Some(sink) = sink {
                    let _ = sink.send(progress);
                }
                false
            }
            WorkerMessage::Complete(text) => {
                self.text = text;
                self.state = JobState::Completed;
                true
            }
            WorkerMessage::Error(reason) => {
                self.last_error = Some(reason);
                self.state = JobState::Failed;
                true
            }
        }
    }

    async fn drive(
        &mut self,
        worker: &mut WorkerHandle,
        sink: Option<&ProgressSink>,
    ) -> Result<(), ExtractionError> {
        self.state = JobState::Running;
        while let Some(message) = worker.recv().await {
            if self.apply(message, sink) {
                return match self.state {
                    JobState::Completed => Ok(()),
                    _ => Err(ExtractionError::Worker(
                        self.last_error.clone().unwrap_or_default(),
                    )),
                };
            }
        }

        self.state = JobState::Failed;
        Err(ExtractionError::WorkerGone)
    }
}

/// Owns the extraction worker and turns `bytes in, text out` into a single async call.
///
/// One job runs at a time; the worker slot is held for the whole call. [`destroy`](Self::destroy)
/// resolves an in-flight call with [`ExtractionError::Cancelled`].
pub struct PdfWorkerManager {
    loader: Arc<dyn DocumentLoader>,
    max_pages: usize,
    timeout: Duration,
    worker: Mutex<Option<WorkerHandle>>,
    teardown: watch::Sender<u64>,
}

impl PdfWorkerManager {
    pub fn new(loader: Arc<dyn DocumentLoader>, max_pages: usize, timeout: Duration) -> Self {
        let (teardown, _) = watch::channel(0);
        Self {
            loader,
            max_pages,
            timeout,
            worker: Mutex::new(None),
            teardown,
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.worker.lock().await.is_some()
    }

    /// Spawns the worker and waits for its ready signal. Does nothing if one is already running.
    pub async fn initialize(&self) -> Result<(), ExtractionError> {
        let mut slot = self.worker.lock().await;
        if slot.is_some() {
            log::debug!("Extraction worker already exists");
            return Ok(());
        }

        let mut handle = worker::spawn(Arc::clone(&self.loader))
            .map_err(|e| ExtractionError::Spawn(e.to_string()))?;

        let handshake = async {
            loop {
                match handle.recv().await {
                    Some(WorkerMessage::Ready) => return Ok(()),
                    Some(WorkerMessage::Error(reason)) => {
                        return Err(ExtractionError::Handshake(reason))
                    }
                    Some(_) => continue,
                    None => return Err(ExtractionError::WorkerGone),
                }
            }
        };

        match tokio::time::timeout(self.timeout, handshake).await {
            Ok(Ok(())) => {
                log::info!("Extraction worker ready");
                *slot = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                handle.terminate();
                Err(e)
            }
            Err(_) => {
                handle.terminate();
                Err(ExtractionError::Handshake(
                    "timed out waiting for worker".to_string(),
                ))
            }
        }
    }

    pub async fn load_pdf(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        self.load_pdf_with_progress(bytes, None).await
    }

    /// Reads up to `max_pages` pages of `bytes`. Progress, if requested, is reported in page
    /// order before the call resolves.
    pub async fn load_pdf_with_progress(
        &self,
        bytes: Vec<u8>,
        progress: Option<ProgressSink>,
    ) -> Result<String, ExtractionError> {
        let mut teardown = self.teardown.subscribe();
        let mut slot = self.worker.lock().await;
        let handle = slot.as_mut().ok_or(ExtractionError::NotInitialized)?;

        let stale = handle.drain();
        if stale > 0 {
            log::debug!("Discarded {} stale worker messages", stale);
        }

        let mut job = ExtractionJob::new(self.max_pages);
        log::info!(
            "Extracting text from PDF ({} bytes, up to {} pages)",
            bytes.len(),
            job.page_limit()
        );

        if handle
            .send(WorkerRequest::LoadPdf {
                bytes,
                max_pages: self.max_pages,
            })
            .await
            .is_err()
        {
            slot.take();
            return Err(ExtractionError::WorkerGone);
        }

        let outcome = tokio::select! {
            result = tokio::time::timeout(self.timeout, job.drive(handle, progress.as_ref())) => {
                result.unwrap_or(Err(ExtractionError::TimedOut))
            }
            _ = teardown.changed() => Err(ExtractionError::Cancelled),
        };

        match outcome {
            Ok(()) => {
                if !job.page_errors().is_empty() {
                    log::info!(
                        "PDF extracted with {} unreadable page(s)",
                        job.page_errors().len()
                    );
                }
                Ok(job.into_text())
            }
            Err(e) => {
                if matches!(e, ExtractionError::TimedOut | ExtractionError::WorkerGone) {
                    if let Some(handle) = slot.take() {
                        handle.terminate();
                    }
                }
                Err(e)
            }
        }
    }

    /// Stops the worker. Safe to call repeatedly; [`initialize`](Self::initialize) starts a fresh one.
    pub async fn destroy(&self) {
        self.teardown.send_modify(|epoch| *epoch += 1);

        if let Some(handle) = self.worker.lock().await.take() {
            handle.terminate();
            log::info!("Extraction worker terminated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::FakeLoader;

    fn manager(loader: FakeLoader) -> PdfWorkerManager {
        PdfWorkerManager::new(Arc::new(loader), 12, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn load_before_initialize_fails() {
        let manager = manager(FakeLoader::with_pages(&["text"]));
        let err = manager.load_pdf(vec![]).await.unwrap_err();
        assert!(matches!(err, ExtractionError::NotInitialized));
        assert_eq!(err.to_string(), "Worker not initialized");
    }

    #[tokio::test]
    async fn page_error_does_not_fail_the_job() {
        let manager = manager(FakeLoader::new(vec![
            Ok("page one".into()),
            Ok("page two".into()),
            Err("corrupt content stream".into()),
            Ok("page four".into()),
            Ok("page five".into()),
        ]));
        manager.initialize().await.unwrap();

        let text = manager.load_pdf(vec![]).await.unwrap();
        assert_eq!(text, "page one\n\npage two\n\npage four\n\npage five");
    }

    #[tokio::test]
    async fn fatal_error_carries_worker_message() {
        let manager = manager(FakeLoader::failing("invalid file header"));
        manager.initialize().await.unwrap();

        let err = manager.load_pdf(vec![]).await.unwrap_err();
        match err {
            ExtractionError::Worker(message) => {
                assert_eq!(message, "PDF processing failed: invalid file header")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // the worker survives a failed document
        assert!(manager.is_initialized().await);
    }

    #[tokio::test]
    async fn initialize_is_idempotent_and_reusable_after_destroy() {
        let manager = manager(FakeLoader::with_pages(&["hello"]));

        manager.initialize().await.unwrap();
        manager.initialize().await.unwrap();
        assert_eq!(manager.load_pdf(vec![]).await.unwrap(), "hello");

        manager.destroy().await;
        manager.destroy().await;
        assert!(matches!(
            manager.load_pdf(vec![]).await,
            Err(ExtractionError::NotInitialized)
        ));

        manager.initialize().await.unwrap();
        assert_eq!(manager.load_pdf(vec![]).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn progress_is_reported_in_page_order() {
        let manager = manager(FakeLoader::with_pages(&["a", "b", "c"]));
        manager.initialize().await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.load_pdf_with_progress(vec![], Some(tx)).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(progress) = rx.try_recv() {
            seen.push((progress.current, progress.total));
        }
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn destroy_cancels_in_flight_job() {
        let loader = FakeLoader::with_pages(&["a", "b", "c", "d"])
            .with_page_delay(Duration::from_millis(200));
        let manager = Arc::new(manager(loader));
        manager.initialize().await.unwrap();

        let job = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.load_pdf(vec![]).await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        manager.destroy().await;

        let result = job.await.unwrap();
        assert!(matches!(result, Err(ExtractionError::Cancelled)));
        assert!(!manager.is_initialized().await);
    }

    #[tokio::test]
    async fn slow_document_times_out_and_resets_worker() {
        let loader = FakeLoader::with_pages(&["a", "b"]).with_page_delay(Duration::from_millis(300));
        let manager = PdfWorkerManager::new(Arc::new(loader), 12, Duration::from_millis(100));
        manager.initialize().await.unwrap();

        let err = manager.load_pdf(vec![]).await.unwrap_err();
        assert!(matches!(err, ExtractionError::TimedOut));
        assert!(!manager.is_initialized().await);
    }

    #[test]
    fn job_tracks_state_transitions() {
        let mut job = ExtractionJob::new(12);
        assert_eq!(job.state(), JobState::Queued);

        assert!(!job.apply(WorkerMessage::Progress { current: 1, total: 2 }, None));
        assert!(!job.apply(
            WorkerMessage::Status("Error processing page 2: boom".into()),
            None
        ));
        assert!(job.apply(WorkerMessage::Complete("done".into()), None));

        assert_eq!(job.state(), JobState::Completed);
        assert_eq!(job.page_errors().len(), 1);
        assert_eq!(job.progress(), Some(Progress { current: 1, total: 2 }));
        assert!(job.last_error().is_none());
        assert_eq!(job.into_text(), "done");
    }
}
