//! Error handling for the resume tailor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeTailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document extraction error: {0}")]
    DocumentExtraction(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Either file or text must be provided")]
    MissingInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeTailorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeTailorError {
    fn from(err: anyhow::Error) -> Self {
        ResumeTailorError::Processing(err.to_string())
    }
}

impl From<zip::result::ZipError> for ResumeTailorError {
    fn from(err: zip::result::ZipError) -> Self {
        ResumeTailorError::DocumentExtraction(format!("Invalid document package: {}", err))
    }
}

impl From<askama::Error> for ResumeTailorError {
    fn from(err: askama::Error) -> Self {
        ResumeTailorError::Export(format!("Failed to render document: {}", err))
    }
}
