//! Accepted upload formats

use std::fmt;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Document formats the extraction pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Jpeg,
    Png,
    Pdf,
}

impl DocumentKind {
    /// Map a declared MIME type. Parameters such as `; charset=` are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "image/jpeg" | "image/jpg" => Some(DocumentKind::Jpeg),
            "image/png" => Some(DocumentKind::Png),
            "application/pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }

    /// Detect the format from leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(DocumentKind::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(DocumentKind::Jpeg)
        } else if bytes.starts_with(PDF_MAGIC) {
            Some(DocumentKind::Pdf)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
            DocumentKind::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}
