//! Input manager for handling different file types

use crate::error::{Result, ResumeTailorError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{debug, info};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from any supported file: DOCX, PDF, plain text or markdown.
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeTailorError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }

        match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            _ => self.extract_document(path).await,
        }
    }

    /// Extract text from a resume document. Only DOCX and PDF are accepted.
    pub async fn extract_document(&self, path: &Path) -> Result<String> {
        match FileType::from_path(path) {
            FileType::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await
            }
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await
            }
            _ => Err(unsupported(path)),
        }
    }

    /// Decode uploaded document bytes through a scratch file.
    ///
    /// The scratch file is removed when this returns, on success or failure.
    pub async fn extract_upload(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let path = Path::new(filename);
        if !FileType::from_path(path).is_document() {
            return Err(unsupported(path));
        }

        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut scratch = tempfile::Builder::new()
            .prefix("resume-upload-")
            .suffix(&suffix)
            .tempfile()?;
        scratch.write_all(bytes)?;
        scratch.flush()?;

        debug!("Wrote {} upload bytes to {}", bytes.len(), scratch.path().display());

        self.extract_document(scratch.path()).await
    }
}

fn unsupported(path: &Path) -> ResumeTailorError {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_else(|| "(none)".to_string());

    ResumeTailorError::UnsupportedFormat(extension)
}
