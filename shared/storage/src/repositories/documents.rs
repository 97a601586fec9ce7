//! Document Repository
//!
//! Uploaded PDF records in `pdf_data.json`. A document's id is its position
//! in the file and is reassigned after every deletion.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use healthbot_models::{Document, DocumentSummary};
use healthbot_utils::{HealthBotError, HealthBotResult};

use crate::json_store::{load_json, save_json};

#[derive(Clone)]
pub struct DocumentRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl DocumentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Appends `document` and returns the id it was assigned.
    pub async fn add(&self, mut document: Document) -> HealthBotResult<usize> {
        let _guard = self.lock.lock().await;
        let mut documents: Vec<Document> = load_json(&self.path).await;
        let id = documents.len();
        document.id = id;
        documents.push(document);
        save_json(&self.path, &documents).await?;
        tracing::info!(pdf_id = id, "Stored document");
        Ok(id)
    }

    pub async fn list(&self) -> Vec<DocumentSummary> {
        let _guard = self.lock.lock().await;
        let documents: Vec<Document> = load_json(&self.path).await;
        documents.iter().map(DocumentSummary::from).collect()
    }

    pub async fn get(&self, id: usize) -> HealthBotResult<Document> {
        let _guard = self.lock.lock().await;
        let documents: Vec<Document> = load_json(&self.path).await;
        documents
            .into_iter()
            .nth(id)
            .ok_or_else(|| HealthBotError::not_found(format!("PDF {}", id)))
    }

    pub async fn len(&self) -> usize {
        let _guard = self.lock.lock().await;
        load_json::<Vec<Document>>(&self.path).await.len()
    }

    /// Removes document `id` and its stored file, then renumbers the rest.
    ///
    /// Failing to remove the file is logged and does not fail the deletion.
    pub async fn delete(&self, id: usize) -> HealthBotResult<Document> {
        let _guard = self.lock.lock().await;
        let mut documents: Vec<Document> = load_json(&self.path).await;
        if id >= documents.len() {
            return Err(HealthBotError::not_found(format!("PDF {}", id)));
        }

        let removed = documents.remove(id);
        remove_stored_file(Path::new(&removed.file_path)).await;
        renumber(&mut documents);
        save_json(&self.path, &documents).await?;
        tracing::info!(pdf_id = id, filename = %removed.filename, remaining = documents.len(), "Deleted document");
        Ok(removed)
    }
}

fn renumber(documents: &mut [Document]) {
    for (position, doc) in documents.iter_mut().enumerate() {
        doc.id = position;
    }
}

async fn remove_stored_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Could not remove stored PDF");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn document(name: &str, file_path: &Path) -> Document {
        Document {
            id: usize::MAX,
            filename: name.to_string(),
            stored_name: format!("20240101_000000_000000_{}", name),
            file_path: file_path.display().to_string(),
            upload_date: Utc::now(),
            file_size: 42,
            page_count: 1,
            extracted_text: format!("text of {}", name),
            ai_analysis: "analysis".to_string(),
            summary: format!("summary of {}", name),
        }
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::new(dir.path().join("pdf_data.json"));

        assert_eq!(repo.add(document("a.pdf", &dir.path().join("a.pdf"))).await.unwrap(), 0);
        assert_eq!(repo.add(document("b.pdf", &dir.path().join("b.pdf"))).await.unwrap(), 1);

        let listed = repo.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, 1);
        assert_eq!(listed[1].filename, "b.pdf");
        assert_eq!(repo.get(0).await.unwrap().extracted_text, "text of a.pdf");
    }

    #[tokio::test]
    async fn test_get_out_of_range_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::new(dir.path().join("pdf_data.json"));
        assert_eq!(repo.get(0).await.unwrap_err().http_status_code(), 404);
        assert_eq!(repo.delete(0).await.unwrap_err().http_status_code(), 404);
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_renumbers() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::new(dir.path().join("pdf_data.json"));

        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            let path = dir.path().join(name);
            tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();
            repo.add(document(name, &path)).await.unwrap();
        }

        let removed = repo.delete(0).await.unwrap();
        assert_eq!(removed.filename, "a.pdf");
        assert!(!dir.path().join("a.pdf").exists());

        let listed = repo.list().await;
        let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
        let names: Vec<_> = listed.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(names, vec!["b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = DocumentRepository::new(dir.path().join("pdf_data.json"));
        repo.add(document("gone.pdf", &dir.path().join("gone.pdf"))).await.unwrap();

        assert!(repo.delete(0).await.is_ok());
        assert_eq!(repo.len().await, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Deleting any document leaves n-1 documents whose ids equal their positions.
        #[test]
        fn prop_delete_keeps_ids_positional(n in 1usize..8, k_seed in 0usize..8) {
            let k = k_seed % n;
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async {
                let dir = tempfile::tempdir().unwrap();
                let repo = DocumentRepository::new(dir.path().join("pdf_data.json"));
                for i in 0..n {
                    let name = format!("doc{}.pdf", i);
                    repo.add(document(&name, &dir.path().join(&name))).await.unwrap();
                }

                let removed = repo.delete(k).await.unwrap();
                prop_assert_eq!(removed.filename, format!("doc{}.pdf", k));

                let listed = repo.list().await;
                prop_assert_eq!(listed.len(), n - 1);
                for (position, doc) in listed.iter().enumerate() {
                    prop_assert_eq!(doc.id, position);
                    let original = if position < k { position } else { position + 1 };
                    prop_assert_eq!(&doc.filename, &format!("doc{}.pdf", original));
                }
                Ok(())
            })?;
        }
    }
}
