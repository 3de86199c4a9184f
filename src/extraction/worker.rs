use std::{
    any::Any,
    io,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use tokio::sync::mpsc;

use super::{
    loader::DocumentLoader,
    messages::{WorkerMessage, WorkerRequest},
};

const WORKER_THREAD_NAME: &str = "pdf-extract-worker";

/// The caller's end of a running extraction worker. Dropping it stops the thread after the
/// page it is currently decoding.
pub struct WorkerHandle {
    requests: mpsc::Sender<WorkerRequest>,
    messages: mpsc::UnboundedReceiver<WorkerMessage>,
    cancel: Arc<AtomicBool>,
}

impl WorkerHandle {
    pub async fn send(&self, request: WorkerRequest) -> Result<(), WorkerRequest> {
        self.requests.send(request).await.map_err(|e| e.0)
    }

    pub async fn recv(&mut self) -> Option<WorkerMessage> {
        self.messages.recv().await
    }

    /// Discards anything left over from a previous job.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.messages.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }

    pub fn terminate(self) {
        drop(self);
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

/// Starts a worker thread. The first message it posts is [`WorkerMessage::Ready`].
pub fn spawn(loader: Arc<dyn DocumentLoader>) -> io::Result<WorkerHandle> {
    let (request_tx, request_rx) = mpsc::channel(1);
    let (message_tx, message_rx) = mpsc::unbounded_channel();
    let cancel = Arc::new(AtomicBool::new(false));

    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn({
            let cancel = Arc::clone(&cancel);
            move || run(loader, request_rx, message_tx, cancel)
        })?;

    Ok(WorkerHandle {
        requests: request_tx,
        messages: message_rx,
        cancel,
    })
}

fn run(
    loader: Arc<dyn DocumentLoader>,
    mut requests: mpsc::Receiver<WorkerRequest>,
    messages: mpsc::UnboundedSender<WorkerMessage>,
    cancel: Arc<AtomicBool>,
) {
    log::debug!("Extraction worker started");
    if messages.send(WorkerMessage::Ready).is_err() {
        return;
    }

    while let Some(request) = requests.blocking_recv() {
        match request {
            WorkerRequest::LoadPdf { bytes, max_pages } => {
                process_pdf(loader.as_ref(), bytes, max_pages, &messages, &cancel)
            }
        }
        if cancel.load(Ordering::SeqCst) {
            break;
        }
    }

    log::debug!("Extraction worker stopped");
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "decoder panicked".to_string())
}

fn process_pdf(
    loader: &dyn DocumentLoader,
    bytes: Vec<u8>,
    max_pages: usize,
    messages: &mpsc::UnboundedSender<WorkerMessage>,
    cancel: &AtomicBool,
) {
    let post = |message: WorkerMessage| {
        let _ = messages.send(message);
    };

    post(WorkerMessage::Status("Starting PDF processing".to_string()));
    post(WorkerMessage::Status("Loading PDF document".to_string()));

    let opened = catch_unwind(AssertUnwindSafe(|| loader.open(bytes)))
        .unwrap_or_else(|payload| Err(panic_reason(payload)));
    let mut document = match opened {
        Ok(document) => document,
        Err(reason) => {
            post(WorkerMessage::Error(format!("PDF processing failed: {}", reason)));
            return;
        }
    };

    let total = document.page_count().min(max_pages);
    post(WorkerMessage::Status(format!(
        "PDF loaded. Processing {} pages",
        total
    )));

    let mut pages = Vec::with_capacity(total);
    for number in 1..=total {
        if cancel.load(Ordering::SeqCst) {
            log::debug!("Extraction cancelled before page {}", number);
            return;
        }

        post(WorkerMessage::Progress {
            current: number,
            total,
        });

        let extracted = catch_unwind(AssertUnwindSafe(|| document.page_text(number)))
            .unwrap_or_else(|payload| Err(panic_reason(payload)));
        match extracted {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(reason) => post(WorkerMessage::Status(format!(
                "Error processing page {}: {}",
                number, reason
            ))),
        }
    }

    post(WorkerMessage::Complete(pages.join("\n\n").trim().to_string()));
}
