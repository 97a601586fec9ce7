use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uploaded PDF together with its extracted text and AI analysis.
///
/// `id` is the record's position in `pdf_data.json`. It is reassigned
/// whenever an earlier document is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,
    pub filename: String,
    pub stored_name: String,
    pub file_path: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: u64,
    #[serde(default)]
    pub page_count: u32,
    pub extracted_text: String,
    pub ai_analysis: String,
    pub summary: String,
}

/// Listing projection of a [`Document`] without the large text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: usize,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub file_size: u64,
    pub summary: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            upload_date: doc.upload_date,
            file_size: doc.file_size,
            summary: doc.summary.clone(),
        }
    }
}

/// Which extraction pass produced a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Layout,
    PageByPage,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskPdfRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskPdfResponse {
    pub answer: String,
    pub pdf_id: usize,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPdfResponse {
    pub success: bool,
    pub pdf_id: usize,
    pub filename: String,
    pub file_size: u64,
    pub page_count: u32,
    pub summary: String,
    pub analysis: String,
}
