//! Shared helpers for router-level integration tests.
//!
//! Tests drive the real router in-process with mock inference backends and
//! an in-memory index, so no external services are needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docent_api::{router, AppState};
use docent_index::MemoryIndex;
use docent_inference::mock::{MockChatBackend, MockEmbeddingBackend};

/// Embedding dimension used across the tests (matches the index default).
pub const DIM: usize = 768;

/// Fixed multipart boundary for hand-built upload bodies.
pub const BOUNDARY: &str = "docent-test-boundary";

/// A router wired to mock backends, with handles for assertions.
pub struct TestContext {
    pub app: Router,
    pub embedder: MockEmbeddingBackend,
    pub chat: MockChatBackend,
    pub index: Arc<MemoryIndex>,
}

/// Build a context with an empty chat script.
pub fn test_context() -> TestContext {
    context_with_chat(MockChatBackend::new())
}

/// Build a context with a scripted chat backend.
pub fn context_with_chat(chat: MockChatBackend) -> TestContext {
    let embedder = MockEmbeddingBackend::new(DIM);
    let index = Arc::new(MemoryIndex::new());
    let state = AppState {
        embedder: Arc::new(embedder.clone()),
        chat: Arc::new(chat.clone()),
        index: index.clone(),
    };
    TestContext {
        app: router(state),
        embedder,
        chat,
        index,
    }
}

/// Build a multipart `POST /ingest` request carrying one file field.
pub fn ingest_request(filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/pdf\r\n\r\n",
            BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/ingest")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Build a `POST /chat` request.
pub fn chat_request(message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&serde_json::json!({ "message": message })).unwrap(),
        ))
        .unwrap()
}

/// Send a request through the router, returning status and JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Whether poppler's pdftotext is installed; extraction-dependent tests
/// skip gracefully without it.
pub async fn pdftotext_available() -> bool {
    docent_api::services::extract::pdftotext_available().await
}

/// A minimal single-page PDF containing the text "Hello World".
pub const HELLO_WORLD_PDF: &[u8] = b"%PDF-1.0
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj

2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj

3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792]
   /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>
endobj

4 0 obj
<< /Length 44 >>
stream
BT /F1 12 Tf 100 700 Td (Hello World) Tj ET
endstream
endobj

5 0 obj
<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>
endobj

xref
0 6
0000000000 65535 f
0000000009 00000 n
0000000058 00000 n
0000000115 00000 n
0000000266 00000 n
0000000360 00000 n

trailer
<< /Size 6 /Root 1 0 R >>
startxref
434
%%EOF";

/// A minimal single-page PDF with an empty content stream (no text layer).
pub const BLANK_PAGE_PDF: &[u8] = b"%PDF-1.0
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj

2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj

3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R >>
endobj

4 0 obj
<< /Length 0 >>
stream

endstream
endobj

xref
0 5
0000000000 65535 f
0000000009 00000 n
0000000058 00000 n
0000000115 00000 n
0000000201 00000 n

trailer
<< /Size 5 /Root 1 0 R >>
startxref
260
%%EOF";
