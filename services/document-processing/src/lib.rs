//! PDF upload pipeline: text extraction, AI analysis and storage.

pub mod extraction;
pub mod pdf_processor;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use extraction::DocumentExtractor;
pub use pdf_processor::{PdfContent, PdfProcessor};
