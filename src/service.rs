//! Request-level operations: parse, analyze, tailor and export

use crate::config::Config;
use crate::error::{Result, ResumeTailorError};
use crate::input::InputManager;
use crate::llm::inference::{OpenAiEngine, TextGenerator};
use crate::llm::tailor::{ResumeTailor, TailoringOutcome};
use crate::output::docx::{DocxExporter, ExportRequest, ExportedDocument};
use crate::processing::job_analyzer::{JobAnalysis, JobAnalyzer};
use crate::processing::sections::ParsedResume;
use crate::processing::segmenter::SectionSegmenter;
use log::info;
use std::sync::Arc;

/// An uploaded resume document.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

pub struct ResumeService {
    input: InputManager,
    segmenter: SectionSegmenter,
    job_analyzer: JobAnalyzer,
    tailor: ResumeTailor,
    exporter: DocxExporter,
}

impl ResumeService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            input: InputManager::new(),
            segmenter: SectionSegmenter::new(),
            job_analyzer: JobAnalyzer::new(),
            tailor: ResumeTailor::new(generator),
            exporter: DocxExporter::new(),
        }
    }

    /// Build the service with the configured generation engine, if a
    /// credential is available.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = OpenAiEngine::from_config(&config.llm)
            .map_err(|e| ResumeTailorError::Configuration(format!("Failed to build generation client: {}", e)))?
            .map(|engine| Arc::new(engine) as Arc<dyn TextGenerator>);

        match &generator {
            Some(_) => info!("Text generation enabled with model {}", config.llm.model),
            None => info!("No generation credential found, tailoring will use the deterministic fallback"),
        }

        Ok(Self::new(generator))
    }

    pub fn has_generator(&self) -> bool {
        self.tailor.has_generator()
    }

    /// Segment pasted text or an uploaded document.
    ///
    /// Non-empty text takes precedence over an upload.
    pub async fn parse_resume(&self, text: Option<String>, upload: Option<Upload>) -> Result<ParsedResume> {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            let sections = self.segmenter.segment(&text);
            return Ok(ParsedResume {
                filename: None,
                raw_text: text,
                sections,
            });
        }

        let Some(upload) = upload else {
            return Err(ResumeTailorError::MissingInput);
        };

        info!("Parsing uploaded resume {} ({} bytes)", upload.filename, upload.bytes.len());
        let raw_text = self.input.extract_upload(&upload.filename, &upload.bytes).await?;
        let sections = self.segmenter.segment(&raw_text);

        Ok(ParsedResume {
            filename: Some(upload.filename),
            raw_text,
            sections,
        })
    }

    pub fn analyze_job(&self, job_text: &str) -> JobAnalysis {
        self.job_analyzer.analyze(job_text)
    }

    pub async fn tailor_resume(&self, resume_text: &str, job_text: &str) -> TailoringOutcome {
        self.tailor.tailor(resume_text, job_text).await
    }

    pub fn export_resume(&self, request: &ExportRequest) -> Result<ExportedDocument> {
        self.exporter.export_request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_takes_precedence() {
        let service = ResumeService::new(None);
        let upload = Upload::new("resume.xyz", b"ignored".to_vec());

        let parsed = service
            .parse_resume(Some("Jane Roe\njane@example.com".to_string()), Some(upload))
            .await
            .unwrap();

        assert_eq!(parsed.filename, None);
        assert_eq!(parsed.sections.contact.name, "Jane Roe");
        assert_eq!(parsed.sections.contact.email.as_deref(), Some("jane@example.com"));
    }

    #[tokio::test]
    async fn test_missing_input() {
        let service = ResumeService::new(None);

        let err = service.parse_resume(None, None).await.unwrap_err();
        assert!(matches!(err, ResumeTailorError::MissingInput));
        assert_eq!(err.to_string(), "Either file or text must be provided");

        let err = service.parse_resume(Some(String::new()), None).await.unwrap_err();
        assert!(matches!(err, ResumeTailorError::MissingInput));
    }

    #[tokio::test]
    async fn test_unsupported_upload() {
        let service = ResumeService::new(None);
        let err = service
            .parse_resume(None, Some(Upload::new("resume.txt", b"text".to_vec())))
            .await
            .unwrap_err();
        assert!(matches!(err, ResumeTailorError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_from_config_without_credential() {
        let config = Config::default();
        let service = ResumeService::from_config(&config).unwrap();
        assert!(!service.has_generator());
    }
}
