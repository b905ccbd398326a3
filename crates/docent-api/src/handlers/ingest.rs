//! Document ingest HTTP handler.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use docent_core::DocumentRecord;

use crate::services::extract::extract_pdf_text;
use crate::{ApiError, AppState};

/// Response body for `POST /ingest`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub filename: String,
    /// Always 1: one record per ingested file, no chunking.
    pub chunks: usize,
}

/// Ingest a PDF: extract text, embed it in document mode, and upsert one
/// record into the vector index.
///
/// # Multipart Fields
/// - `file`: the PDF upload (required; filename must end in `.pdf`)
///
/// # Returns
/// - 200 OK with `{"status": "success", "filename": ..., "chunks": 1}`
/// - 400 Bad Request if the file is missing, not a PDF, or yields no text
/// - 500 Internal Server Error when an external service fails
pub async fn ingest_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|n| n.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let data = file_data
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    let filename = filename
        .ok_or_else(|| ApiError::BadRequest("Uploaded file has no filename".to_string()))?;

    if !filename.ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "Only PDF files are supported.".to_string(),
        ));
    }

    let text = extract_pdf_text(&data).await?;
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Could not extract text from PDF.".to_string(),
        ));
    }

    let embedding = state.embedder.embed_document(&text).await.map_err(|e| {
        error!(error = %e, filename, "Error embedding document");
        ApiError::from(e)
    })?;

    let record = DocumentRecord::new(text, filename.clone(), embedding);
    let record_id = record.id;

    state.index.upload(record).await.map_err(|e| {
        error!(error = %e, filename, "Error uploading document to index");
        ApiError::from(e)
    })?;

    info!(filename, %record_id, "Document ingested");

    Ok(Json(IngestResponse {
        status: "success",
        filename,
        chunks: 1,
    }))
}
