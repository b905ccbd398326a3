//! Router-level tests for the document ingestion endpoint.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use common::{
    ingest_request, pdftotext_available, send, test_context, BLANK_PAGE_PDF, BOUNDARY, DIM,
    HELLO_WORLD_PDF,
};

#[tokio::test]
async fn test_rejects_non_pdf_filename() {
    let ctx = test_context();

    let (status, body) = send(&ctx.app, ingest_request("notes.txt", HELLO_WORLD_PDF)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only PDF files are supported.");
    // Nothing may reach the embedder or the index on a rejected upload.
    assert_eq!(ctx.embedder.call_count(), 0);
    assert_eq!(ctx.index.len(), 0);
}

#[tokio::test]
async fn test_rejects_payload_without_pdf_header() {
    let ctx = test_context();

    let (status, body) = send(&ctx.app, ingest_request("fake.pdf", b"plain text body")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("%PDF"));
    assert_eq!(ctx.embedder.call_count(), 0);
    assert_eq!(ctx.index.len(), 0);
}

#[tokio::test]
async fn test_rejects_request_without_file_field() {
    let ctx = test_context();

    // A multipart body whose only field is not named "file".
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"metadata\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method("POST")
        .uri("/ingest")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&ctx.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("file"));
    assert_eq!(ctx.index.len(), 0);
}

#[tokio::test]
async fn test_successful_ingest_upserts_one_record() {
    if !pdftotext_available().await {
        eprintln!("Skipping: pdftotext not installed");
        return;
    }

    let ctx = test_context();

    let (status, body) = send(&ctx.app, ingest_request("hello.pdf", HELLO_WORLD_PDF)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["filename"], "hello.pdf");
    assert_eq!(body["chunks"], 1);

    // Exactly one document-mode embedding of the extracted text.
    assert_eq!(ctx.embedder.document_call_count(), 1);
    assert_eq!(ctx.embedder.query_call_count(), 0);
    assert!(ctx.embedder.calls()[0].text.contains("Hello World"));

    let records = ctx.index.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, "hello.pdf");
    assert_eq!(records[0].embedding.len(), DIM);
    assert!(records[0].content.contains("Hello World"));
}

#[tokio::test]
async fn test_double_ingest_yields_two_distinct_records() {
    if !pdftotext_available().await {
        eprintln!("Skipping: pdftotext not installed");
        return;
    }

    let ctx = test_context();

    let (first, _) = send(&ctx.app, ingest_request("hello.pdf", HELLO_WORLD_PDF)).await;
    let (second, _) = send(&ctx.app, ingest_request("hello.pdf", HELLO_WORLD_PDF)).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    // Each upload gets a fresh id, so re-ingesting does not overwrite.
    let records = ctx.index.records();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].id, records[1].id);
}

#[tokio::test]
async fn test_blank_page_upload_is_rejected_without_upsert() {
    if !pdftotext_available().await {
        eprintln!("Skipping: pdftotext not installed");
        return;
    }

    let ctx = test_context();

    let (status, body) = send(&ctx.app, ingest_request("blank.pdf", BLANK_PAGE_PDF)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not extract text from PDF.");
    assert_eq!(ctx.embedder.call_count(), 0);
    assert_eq!(ctx.index.len(), 0);
}

#[tokio::test]
async fn test_embedding_failure_maps_to_internal_error() {
    if !pdftotext_available().await {
        eprintln!("Skipping: pdftotext not installed");
        return;
    }

    use std::sync::Arc;

    use docent_api::{router, AppState};
    use docent_index::MemoryIndex;
    use docent_inference::mock::{MockChatBackend, MockEmbeddingBackend};

    let embedder = MockEmbeddingBackend::new(DIM).with_failure("embedding service down");
    let index = Arc::new(MemoryIndex::new());
    let app = router(AppState {
        embedder: Arc::new(embedder),
        chat: Arc::new(MockChatBackend::new()),
        index: index.clone(),
    });

    let (status, body) = send(&app, ingest_request("hello.pdf", HELLO_WORLD_PDF)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("embedding service down"));
    assert_eq!(index.len(), 0);
}
