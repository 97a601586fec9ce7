//! PDF Handlers
//!
//! Upload, listing, retrieval, deletion and question answering for stored
//! documents.

use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};

use healthbot_models::{
    AskPdfRequest, AskPdfResponse, Document, DocumentSummary, StatusResponse, UploadPdfResponse,
};
use healthbot_utils::{HealthBotError, HealthBotResult};

use crate::extract::ApiJson;
use crate::AppState;

const FILE_FIELD: &str = "file";

/// POST /upload_pdf
pub async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HealthBotResult<Json<UploadPdfResponse>> {
    let result = receive_and_ingest(&state, multipart).await;
    match &result {
        Ok(_) => state.metrics.pdf_uploads.inc(),
        Err(e) => {
            state.metrics.pdf_rejections.inc();
            tracing::warn!(error = %e, "PDF upload rejected");
        }
    }

    let document = result?;
    tracing::info!(pdf_id = document.id, filename = %document.filename, "PDF uploaded");
    Ok(Json(UploadPdfResponse {
        success: true,
        pdf_id: document.id,
        filename: document.filename,
        file_size: document.file_size,
        page_count: document.page_count,
        summary: document.summary,
        analysis: document.ai_analysis,
    }))
}

async fn receive_and_ingest(state: &AppState, mut multipart: Multipart) -> HealthBotResult<Document> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HealthBotError::validation("file", format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| HealthBotError::validation("file", "No file selected"))?;

        // Reject by name before buffering the body.
        state.extractor.validate_upload(&filename, 0)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| HealthBotError::validation("file", format!("Failed to read file data: {}", e)))?;

        return state.extractor.ingest(&filename, &data).await;
    }

    Err(HealthBotError::validation("file", "No file provided"))
}

/// GET /get_pdfs
pub async fn get_pdfs(State(state): State<AppState>) -> Json<Vec<DocumentSummary>> {
    Json(state.storage.documents.list().await)
}

/// GET /get_pdf/:id
pub async fn get_pdf(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> HealthBotResult<Json<Document>> {
    Ok(Json(state.storage.documents.get(id).await?))
}

/// DELETE /delete_pdf/:id
pub async fn delete_pdf(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> HealthBotResult<Json<StatusResponse>> {
    let removed = state.storage.documents.delete(id).await?;
    tracing::info!(pdf_id = id, filename = %removed.filename, "PDF deleted");
    Ok(Json(StatusResponse::ok(format!("Deleted {}", removed.filename))))
}

/// POST /ask_pdf/:id
pub async fn ask_pdf(
    State(state): State<AppState>,
    Path(id): Path<usize>,
    ApiJson(request): ApiJson<AskPdfRequest>,
) -> HealthBotResult<Json<AskPdfResponse>> {
    let (document, answer) = state.extractor.ask(id, &request.question).await.map_err(|e| {
        tracing::error!(pdf_id = id, error = %e, "PDF question failed");
        e
    })?;
    Ok(Json(AskPdfResponse {
        answer,
        pdf_id: document.id,
        filename: document.filename,
    }))
}
