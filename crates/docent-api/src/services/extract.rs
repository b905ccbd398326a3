//! PDF text extraction using `pdftotext` (poppler-utils).
//!
//! The upload is written to a temporary file (pdftotext reads from a file
//! path), the page count is read via `pdfinfo`, and text is extracted
//! page-by-page. Non-empty page extractions are joined with newline
//! separators. The temporary file is removed on every exit path — the
//! `NamedTempFile` guard deletes it on drop, success or failure.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use docent_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use docent_core::{Error, Result};

/// Run a command with a timeout, returning stdout as a string.
async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    let output = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::Extraction(format!("External command timed out after {}s", timeout_secs))
        })?
        .map_err(|e| Error::Extraction(format!("Failed to execute command: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Extraction(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse the page count out of `pdfinfo` output.
fn parse_page_count(output: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() == "Pages" {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Extract text from PDF bytes.
///
/// Returns [`Error::InvalidInput`] for empty data or a missing `%PDF`
/// header; the extracted text may still be empty for scanned documents.
pub async fn extract_pdf_text(data: &[u8]) -> Result<String> {
    extract_in(data, &std::env::temp_dir()).await
}

async fn extract_in(data: &[u8], dir: &Path) -> Result<String> {
    if data.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot extract text from an empty upload".to_string(),
        ));
    }

    // Validate PDF magic bytes (%PDF)
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidInput(
            "Upload is not a valid PDF (missing %PDF header)".to_string(),
        ));
    }

    let mut tmpfile = NamedTempFile::new_in(dir)?;
    tmpfile.write_all(data)?;
    let tmp_path = tmpfile.path().to_string_lossy().to_string();

    let pages = match run_cmd_with_timeout(
        Command::new("pdfinfo").arg(&tmp_path),
        EXTRACTION_CMD_TIMEOUT_SECS,
    )
    .await
    {
        Ok(output) => parse_page_count(&output).unwrap_or(0),
        Err(e) => {
            warn!(error = %e, "pdfinfo failed, falling back to whole-document extraction");
            0
        }
    };

    let text = if pages > 0 {
        debug!(pages, "Extracting PDF page by page");
        let mut page_texts = Vec::new();
        for page in 1..=pages {
            let extracted = run_cmd_with_timeout(
                Command::new("pdftotext")
                    .arg("-f")
                    .arg(page.to_string())
                    .arg("-l")
                    .arg(page.to_string())
                    .arg(&tmp_path)
                    .arg("-"),
                EXTRACTION_CMD_TIMEOUT_SECS,
            )
            .await?;
            let trimmed = extracted.trim();
            if !trimmed.is_empty() {
                page_texts.push(trimmed.to_string());
            }
        }
        page_texts.join("\n")
    } else {
        // Page count unknown: single whole-document pass.
        run_cmd_with_timeout(
            Command::new("pdftotext").arg(&tmp_path).arg("-"),
            EXTRACTION_CMD_TIMEOUT_SECS,
        )
        .await?
    };

    Ok(text)
}

/// Whether the `pdftotext` binary is available on this host.
pub async fn pdftotext_available() -> bool {
    match Command::new("pdftotext").arg("-v").output().await {
        Ok(output) => {
            // pdftotext -v prints version to stderr and exits with 0 or 99
            // depending on the version. Both indicate the binary exists.
            output.status.success() || output.status.code() == Some(99)
        }
        Err(_) => false,
    }
}

/// A minimal single-page PDF containing the text "Hello World".
#[cfg(test)]
pub(crate) const HELLO_WORLD_PDF: &[u8] = b"%PDF-1.0
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
#[cfg(test)]
pub(crate) const BLANK_PAGE_PDF: &[u8] = b"%PDF-1.0
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
