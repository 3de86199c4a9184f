use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    errors::{AppError, AppResult, InputError},
    extraction::{DocumentLoader, PdfWorkerManager},
};

const PDF_MAGIC: &[u8] = b"%PDF";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A missing content type is allowed; the magic bytes decide later.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), InputError> {
    let declared_pdf = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim())
        .map_or(true, |ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    if declared_pdf {
        Ok(())
    } else {
        Err(InputError::NotPdf)
    }
}

/// Rejects anything that is not a PDF within the size limit, before a worker is started.
pub fn check_upload(
    content_type: Option<&str>,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<(), InputError> {
    check_content_type(content_type)?;
    if bytes.len() > max_bytes {
        return Err(InputError::FileTooLarge { max_bytes });
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(InputError::NotPdf);
    }
    Ok(())
}

pub struct ExtractionService {
    loader: Arc<dyn DocumentLoader>,
    max_pages: usize,
    max_upload_bytes: usize,
    timeout: Duration,
}

impl ExtractionService {
    pub fn new(loader: Arc<dyn DocumentLoader>, config: &Config) -> Self {
        Self {
            loader,
            max_pages: config.max_pdf_pages,
            max_upload_bytes: config.max_upload_bytes,
            timeout: config.extraction_timeout(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Starts a worker for this upload, reads the text and tears the worker down again.
    pub async fn extract_text(
        &self,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        check_upload(content_type, &bytes, self.max_upload_bytes)?;

        let manager = PdfWorkerManager::new(Arc::clone(&self.loader), self.max_pages, self.timeout);
        manager.initialize().await.map_err(|e| {
            log::error!("Error initializing extraction worker: {}", e);
            AppError::from(e)
        })?;

        let result = manager.load_pdf(bytes).await;
        manager.destroy().await;

        let text = result.map_err(|e| {
            log::error!("Error reading PDF: {}", e);
            AppError::from(e)
        })?;
        log::info!("Extracted {} characters from PDF", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::FakeLoader;

    fn service(loader: FakeLoader) -> ExtractionService {
        ExtractionService::new(Arc::new(loader), &Config::test_config())
    }

    #[test]
    fn upload_guard_checks_type_size_and_magic() {
        assert_eq!(
            check_upload(Some("image/png"), b"%PDF-1.7", 100),
            Err(InputError::NotPdf)
        );
        assert_eq!(
            check_upload(Some("application/pdf"), &[b'%'; 101], 100),
            Err(InputError::FileTooLarge { max_bytes: 100 })
        );
        assert_eq!(
            check_upload(None, b"PK\x03\x04", 100),
            Err(InputError::NotPdf)
        );
        assert!(check_upload(Some("application/pdf; charset=binary"), b"%PDF-1.7", 100).is_ok());
        assert!(check_upload(None, b"%PDF-1.7", 100).is_ok());
    }

    #[test]
    fn declared_type_is_checked_without_a_body() {
        assert_eq!(check_content_type(Some("image/png")), Err(InputError::NotPdf));
        assert!(check_content_type(Some("Application/PDF")).is_ok());
        assert!(check_content_type(None).is_ok());
    }

    #[actix_rt::test]
    async fn extracts_text_through_a_fresh_worker() {
        let service = service(FakeLoader::with_pages(&["alpha", "beta"]));
        let text = service
            .extract_text(Some("application/pdf"), b"%PDF-1.7".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "alpha\n\nbeta");
    }

    #[actix_rt::test]
    async fn fatal_worker_error_maps_to_extraction_failed() {
        let service = service(FakeLoader::failing("broken xref table"));
        let err = service
            .extract_text(Some("application/pdf"), b"%PDF-1.7".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed));
        assert_eq!(err.to_string(), "Failed to read PDF file. Please try again.");
    }

    #[actix_rt::test]
    async fn wrong_file_type_is_rejected_before_extraction() {
        let service = service(FakeLoader::with_pages(&["never read"]));
        let err = service
            .extract_text(Some("text/plain"), b"%PDF".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(InputError::NotPdf)));
    }
}
