//! Document Extraction Service
//!
//! Orchestrates the upload pipeline: save the original, extract its text,
//! ask the model for an analysis and store the combined record.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use healthbot_ai_agent::{summarize_analysis, DocumentAnalyzer};
use healthbot_models::Document;
use healthbot_storage::DocumentRepository;
use healthbot_utils::{
    sanitize_filename, validate_file_size, validate_file_type, validate_message, HealthBotError,
    HealthBotResult, StorageConfig, ALLOWED_UPLOAD_EXTENSIONS,
};

use crate::pdf_processor::{PdfContent, PdfProcessor};

const NO_TEXT_MESSAGE: &str =
    "Could not extract text from PDF. The file may be scanned, image-based or encrypted.";

/// Document extractor service
#[derive(Clone)]
pub struct DocumentExtractor {
    documents: DocumentRepository,
    analyzer: DocumentAnalyzer,
    pdf_processor: Arc<PdfProcessor>,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
}

impl DocumentExtractor {
    pub fn new(documents: DocumentRepository, analyzer: DocumentAnalyzer, storage: &StorageConfig) -> Self {
        Self {
            documents,
            analyzer,
            pdf_processor: Arc::new(PdfProcessor::new()),
            upload_dir: storage.upload_dir.clone(),
            max_upload_bytes: storage.max_upload_bytes,
        }
    }

    /// Rejects uploads that are not PDFs or exceed the size ceiling.
    pub fn validate_upload(&self, filename: &str, size: u64) -> HealthBotResult<String> {
        validate_file_type(filename, ALLOWED_UPLOAD_EXTENSIONS)?;
        validate_file_size(size, self.max_upload_bytes)?;
        sanitize_filename(filename)
            .ok_or_else(|| HealthBotError::validation("filename", "Invalid filename"))
    }

    /// Runs the full upload pipeline and returns the stored record.
    ///
    /// Nothing is added to the document store unless text was extracted.
    pub async fn ingest(&self, filename: &str, data: &[u8]) -> HealthBotResult<Document> {
        let safe_name = self.validate_upload(filename, data.len() as u64)?;
        let uploaded_at = Utc::now();
        let stored_name = format!("{}_{}", uploaded_at.format("%Y%m%d_%H%M%S_%6f"), safe_name);
        let file_path = self.upload_dir.join(&stored_name);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(&file_path, data).await.map_err(|e| {
            HealthBotError::storage(format!("Failed to save upload {}: {}", stored_name, e))
        })?;
        tracing::info!(filename = %filename, stored_name = %stored_name, size = data.len(), "Saved uploaded PDF");

        let content = self.extract_text(file_path.clone()).await?;
        if content.is_empty() {
            discard(&file_path).await;
            return Err(HealthBotError::document_processing(NO_TEXT_MESSAGE));
        }
        tracing::info!(
            filename = %filename,
            pages = content.page_count,
            chars = content.text.chars().count(),
            method = ?content.method,
            "Extracted PDF text"
        );

        let analysis = self.analyzer.analyze(&content.text, filename).await;
        let summary = summarize_analysis(&analysis, &content.text);

        let mut document = Document {
            id: 0,
            filename: filename.to_string(),
            stored_name,
            file_path: file_path.display().to_string(),
            upload_date: uploaded_at,
            file_size: data.len() as u64,
            page_count: content.page_count,
            extracted_text: content.text,
            ai_analysis: analysis,
            summary,
        };

        match self.documents.add(document.clone()).await {
            Ok(id) => {
                document.id = id;
                Ok(document)
            }
            Err(e) => {
                discard(&file_path).await;
                Err(e)
            }
        }
    }

    /// Answers `question` about stored document `id`.
    pub async fn ask(&self, id: usize, question: &str) -> HealthBotResult<(Document, String)> {
        let question = validate_message("question", question)?;
        let document = self.documents.get(id).await?;
        let answer = self
            .analyzer
            .answer(&document.extracted_text, &document.filename, question)
            .await?;
        Ok((document, answer))
    }

    /// Runs the blocking PDF parsers off the async executor.
    pub async fn extract_text(&self, path: PathBuf) -> HealthBotResult<PdfContent> {
        let processor = Arc::clone(&self.pdf_processor);
        tokio::task::spawn_blocking(move || processor.extract(&path))
            .await
            .map_err(|e| HealthBotError::internal(format!("PDF extraction task failed: {}", e)))
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Could not remove rejected upload");
    }
}
