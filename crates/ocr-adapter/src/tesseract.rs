//! Tesseract backend driven through its command-line interface
//!
//! The image is streamed to `tesseract stdin stdout tsv` and the TSV report is
//! folded into line-level text blocks. Running OCR as a child process keeps
//! the CPU-heavy work off the async runtime and avoids linking Leptonica.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use shared_types::TextBlock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExtractionError;
use crate::kind::DocumentKind;
use crate::pdf::rasterize_first_page;
use crate::tsv::parse_tsv;
use crate::TextExtractor;

pub const ENGINE_NAME: &str = "Tesseract";

pub struct TesseractEngine {
    binary: PathBuf,
    pdftoppm: PathBuf,
    lang: String,
}

impl TesseractEngine {
    /// `lang` uses Tesseract's syntax, e.g. `eng` or `eng+hin`
    pub fn new(binary: impl Into<PathBuf>, lang: &str) -> Self {
        Self {
            binary: binary.into(),
            pdftoppm: PathBuf::from("pdftoppm"),
            lang: lang.to_string(),
        }
    }

    /// Override the rasterizer used for PDF uploads
    pub fn with_pdftoppm(mut self, pdftoppm: impl Into<PathBuf>) -> Self {
        self.pdftoppm = pdftoppm.into();
        self
    }

    /// Check that the binary runs; returns the first line of `--version`
    pub async fn probe(&self) -> Result<String, ExtractionError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        if !output.status.success() {
            return Err(ExtractionError::Unavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    async fn recognize(&self, image: &[u8]) -> Result<String, ExtractionError> {
        let mut command = Command::new(&self.binary);
        command.args(["stdin", "stdout", "-l", self.lang.as_str(), "tsv"]);

        let output = run_with_input(command, image.to_vec())
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextExtractor for TesseractEngine {
    async fn extract(&self, image: &[u8]) -> Result<Vec<TextBlock>, ExtractionError> {
        let blocks = if DocumentKind::sniff(image) == Some(DocumentKind::Pdf) {
            let page = rasterize_first_page(&self.pdftoppm, image).await?;
            parse_tsv(&self.recognize(&page).await?)
        } else {
            parse_tsv(&self.recognize(image).await?)
        };

        debug!(blocks = blocks.len(), bytes = image.len(), "Tesseract extraction finished");
        Ok(blocks)
    }

    fn engine_name(&self) -> &str {
        ENGINE_NAME
    }

    fn languages(&self) -> Vec<String> {
        self.lang.split('+').map(str::to_string).collect()
    }
}

/// Spawn `command`, stream `input` to its stdin and collect its output
pub(crate) async fn run_with_input(mut command: Command, input: Vec<u8>) -> io::Result<Output> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    // Write from a separate task so a full stdout pipe cannot deadlock us
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdin not captured"))?;
    let writer = tokio::spawn(async move {
        stdin.write_all(&input).await?;
        stdin.shutdown().await
    });

    let output = child.wait_with_output().await?;
    match writer.await {
        Ok(Ok(())) => {}
        // The engine may close stdin early once it has rejected the input;
        // its exit status carries the real error.
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(e),
        Err(join) => return Err(io::Error::new(io::ErrorKind::Other, join)),
    }
    Ok(output)
}

pub(crate) fn spawn_error(program: &Path, err: io::Error) -> ExtractionError {
    if err.kind() == io::ErrorKind::NotFound {
        ExtractionError::Unavailable(format!("{} not found", program.display()))
    } else {
        ExtractionError::Unavailable(format!("failed to run {}: {}", program.display(), err))
    }
}
