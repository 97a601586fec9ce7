//! PDF Processor
//!
//! Extracts text from PDF files. The layout-aware pass of `pdf-extract`
//! runs first; when it yields nothing, `lopdf` extracts page by page.

use anyhow::{anyhow, Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use healthbot_models::ExtractionMethod;

/// PDF processing result
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Page texts joined with newlines. Empty when no pass found text.
    pub text: String,
    pub page_count: u32,
    pub method: ExtractionMethod,
}

impl PdfContent {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// PDF processor
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from the PDF at `path`.
    ///
    /// Never fails: unreadable or image-only documents produce empty text
    /// with `ExtractionMethod::None`.
    pub fn extract(&self, path: &Path) -> PdfContent {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read PDF");
                return PdfContent {
                    text: String::new(),
                    page_count: 0,
                    method: ExtractionMethod::None,
                };
            }
        };

        let mut page_count = 0;
        match self.extract_layout(&data) {
            Ok(pages) => {
                page_count = pages.len() as u32;
                let text = join_pages(pages);
                if !text.trim().is_empty() {
                    return PdfContent { text, page_count, method: ExtractionMethod::Layout };
                }
                tracing::debug!(path = %path.display(), "Layout extraction found no text");
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Layout extraction failed");
            }
        }

        match self.extract_page_by_page(&data) {
            Ok((pages, count)) => {
                let text = join_pages(pages);
                let page_count = page_count.max(count);
                if text.trim().is_empty() {
                    PdfContent { text: String::new(), page_count, method: ExtractionMethod::None }
                } else {
                    PdfContent { text, page_count, method: ExtractionMethod::PageByPage }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Page-by-page extraction failed");
                PdfContent { text: String::new(), page_count, method: ExtractionMethod::None }
            }
        }
    }

    /// Layout-aware pass over every page.
    fn extract_layout(&self, data: &[u8]) -> Result<Vec<String>> {
        // pdf-extract panics on some malformed documents.
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }))
        .map_err(|_| anyhow!("PDF extraction panicked (malformed document)"))?
        .context("Failed to extract text from PDF")
    }

    /// Simpler pass that asks `lopdf` for each page's text separately.
    fn extract_page_by_page(&self, data: &[u8]) -> Result<(Vec<String>, u32)> {
        let doc = lopdf::Document::load_mem(data).context("Failed to parse PDF structure")?;
        let pages = doc.get_pages();
        let count = pages.len() as u32;

        let texts = pages
            .keys()
            .filter_map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::debug!(page = page_number, error = %e, "Skipping unreadable page");
                    None
                }
            })
            .collect();

        Ok((texts, count))
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .map(|page| page.trim_matches(|c: char| c == '\n' || c == '\x0C'))
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{blank_pdf, text_pdf};

    fn write(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_extracts_text_from_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "report.pdf", &text_pdf(&["Cholesterol panel", "Follow up in March"]));

        let content = PdfProcessor::new().extract(&path);

        assert!(!content.is_empty());
        assert_eq!(content.page_count, 2);
        assert_ne!(content.method, ExtractionMethod::None);
        assert!(content.text.contains("Cholesterol"));
        assert!(content.text.contains("March"));
    }

    #[test]
    fn test_page_without_text_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "scan.pdf", &blank_pdf());

        let content = PdfProcessor::new().extract(&path);

        assert!(content.is_empty());
        assert_eq!(content.method, ExtractionMethod::None);
    }

    #[test]
    fn test_garbage_bytes_yield_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fake.pdf", b"this is not a pdf at all");

        let content = PdfProcessor::new().extract(&path);

        assert!(content.is_empty());
        assert_eq!(content.page_count, 0);
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let content = PdfProcessor::new().extract(Path::new("/definitely/not/here.pdf"));
        assert!(content.is_empty());
    }

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let joined = join_pages(vec!["one\n".into(), "\x0C\n".into(), "\ntwo".into()]);
        assert_eq!(joined, "one\ntwo");
    }
}
