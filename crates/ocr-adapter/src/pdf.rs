//! PDF rasterization ahead of OCR
//!
//! Tesseract only reads raster images, so the first page of an uploaded PDF is
//! rendered to PNG with poppler's `pdftoppm` inside a scratch directory.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::ExtractionError;
use crate::tesseract::spawn_error;

/// Render resolution; 300 DPI is Tesseract's recommended input density
pub const RASTER_DPI: u32 = 300;

pub async fn rasterize_first_page(
    pdftoppm: &Path,
    pdf: &[u8],
) -> Result<Vec<u8>, ExtractionError> {
    let scratch = tempfile::tempdir()
        .map_err(|e| ExtractionError::Engine(format!("cannot create scratch dir: {}", e)))?;
    let input = scratch.path().join("document.pdf");
    let prefix = scratch.path().join("page");

    tokio::fs::write(&input, pdf)
        .await
        .map_err(|e| ExtractionError::Engine(format!("cannot stage PDF: {}", e)))?;

    let output = Command::new(pdftoppm)
        .arg("-png")
        .arg("-r")
        .arg(RASTER_DPI.to_string())
        .args(["-f", "1", "-l", "1", "-singlefile"])
        .arg(&input)
        .arg(&prefix)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| spawn_error(pdftoppm, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::Engine(format!(
            "pdftoppm exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let page = tokio::fs::read(prefix.with_extension("png"))
        .await
        .map_err(|e| ExtractionError::Engine(format!("rasterized page missing: {}", e)))?;
    debug!(pdf_bytes = pdf.len(), png_bytes = page.len(), "Rasterized first PDF page");
    Ok(page)
}
