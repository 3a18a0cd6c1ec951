//! Resume tailoring with a text generator and a deterministic fallback
//!
//! With a generator the segmented resume and the job analysis are sent as one
//! prompt and the reply's JSON object is merged field by field over the
//! original sections. Without one, or when the call or the reply fails, a fixed
//! transform of the original sections is returned instead and the outcome is
//! marked as degraded.

use crate::llm::inference::TextGenerator;
use crate::llm::prompts::{PromptParams, PromptTemplates, SYSTEM_INSTRUCTION};
use crate::processing::job_analyzer::JobAnalyzer;
use crate::processing::sections::ResumeSections;
use crate::processing::segmenter::SectionSegmenter;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const FALLBACK_SUMMARY_SUFFIX: &str = " (ATS-optimized)";
pub const FALLBACK_BULLET_MARKER: &str = "✓ ";
pub const FALLBACK_BULLET_LIMIT: usize = 5;

/// Summary, experience bullets and skills of one resume version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSet {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub skills: String,
}

impl SectionSet {
    pub fn from_sections(sections: &ResumeSections) -> Self {
        Self {
            summary: sections.summary.content.clone(),
            experience: sections.experience.bullets.clone(),
            skills: sections.skills.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChanges {
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailoringResult {
    pub original: SectionSet,
    pub tailored: SectionSet,
    pub changes: SectionChanges,
}

/// Why the deterministic transform was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    NoCredential,
    ServiceError(String),
    Timeout(u64),
    MalformedReply(String),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::NoCredential => write!(f, "no text generation credential configured"),
            DegradeReason::ServiceError(msg) => write!(f, "generation service failed: {}", msg),
            DegradeReason::Timeout(secs) => write!(f, "generation service timed out after {}s", secs),
            DegradeReason::MalformedReply(msg) => write!(f, "generation reply was not usable: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TailoringOutcome {
    Success { result: TailoringResult },
    Degraded { result: TailoringResult, reason: DegradeReason },
}

impl TailoringOutcome {
    pub fn result(&self) -> &TailoringResult {
        match self {
            TailoringOutcome::Success { result } | TailoringOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn into_result(self) -> TailoringResult {
        match self {
            TailoringOutcome::Success { result } | TailoringOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn degrade_reason(&self) -> Option<&DegradeReason> {
        match self {
            TailoringOutcome::Success { .. } => None,
            TailoringOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degrade_reason().is_some()
    }
}

pub struct ResumeTailor {
    generator: Option<Arc<dyn TextGenerator>>,
    segmenter: SectionSegmenter,
    job_analyzer: JobAnalyzer,
    prompt_templates: PromptTemplates,
}

impl ResumeTailor {
    /// `None` selects the deterministic transform for every call.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            segmenter: SectionSegmenter::new(),
            job_analyzer: JobAnalyzer::new(),
            prompt_templates: PromptTemplates::default(),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn tailor(&self, resume_text: &str, job_text: &str) -> TailoringOutcome {
        let sections = self.segmenter.segment(resume_text);

        let Some(generator) = &self.generator else {
            info!("No generation credential, using deterministic tailoring");
            return degraded(&sections, DegradeReason::NoCredential);
        };

        let analysis = self.job_analyzer.analyze(job_text);
        let prompt = self
            .prompt_templates
            .render_tailoring(&PromptParams::new(&sections, &analysis));

        let timeout = generator.timeout();
        let reply = match tokio::time::timeout(timeout, generator.generate(SYSTEM_INSTRUCTION, &prompt)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return degraded(&sections, DegradeReason::ServiceError(e.to_string())),
            Err(_) => return degraded(&sections, DegradeReason::Timeout(timeout.as_secs())),
        };

        info!("Received {} characters from {} in {}ms", reply.text.len(), reply.model, reply.inference_time_ms);

        match parse_reply(&reply.text) {
            Ok(suggestions) => TailoringOutcome::Success {
                result: merge_suggestions(&sections, &suggestions),
            },
            Err(msg) => degraded(&sections, DegradeReason::MalformedReply(msg)),
        }
    }
}

fn degraded(sections: &ResumeSections, reason: DegradeReason) -> TailoringOutcome {
    if reason != DegradeReason::NoCredential {
        warn!("Falling back to deterministic tailoring: {}", reason);
    }
    TailoringOutcome::Degraded {
        result: fallback_tailoring(sections),
        reason,
    }
}

/// Fixed transform used when no generated suggestions are available.
pub fn fallback_tailoring(sections: &ResumeSections) -> TailoringResult {
    let original = SectionSet::from_sections(sections);

    let tailored = SectionSet {
        summary: format!("{}{}", original.summary, FALLBACK_SUMMARY_SUFFIX),
        experience: original
            .experience
            .iter()
            .take(FALLBACK_BULLET_LIMIT)
            .map(|bullet| format!("{}{}", FALLBACK_BULLET_MARKER, bullet))
            .collect(),
        skills: original.skills.clone(),
    };

    let changes = SectionChanges {
        summary: vec!["Added ATS-friendly keywords".to_string(), "Improved clarity".to_string()],
        experience: vec![
            "Reordered bullets to highlight relevant experience".to_string(),
            "Added action verbs".to_string(),
        ],
        skills: vec!["Reordered to match job requirements".to_string()],
    };

    TailoringResult { original, tailored, changes }
}

/// The JSON object spanning the first `{` to the last `}` of a reply.
fn parse_reply(text: &str) -> Result<serde_json::Map<String, Value>, String> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err("no JSON object in reply".to_string());
    };
    if end < start {
        return Err("no JSON object in reply".to_string());
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("reply JSON is not an object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn field<'a>(suggestions: &'a serde_json::Map<String, Value>, section: &str, key: &str) -> Option<&'a Value> {
    suggestions.get(section)?.get(key)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Overlay generated fields on the original sections; each missing or
/// malformed field keeps its original value.
fn merge_suggestions(sections: &ResumeSections, suggestions: &serde_json::Map<String, Value>) -> TailoringResult {
    let original = SectionSet::from_sections(sections);

    let summary = field(suggestions, "summary", "tailored")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| original.summary.clone());

    let experience = string_list(field(suggestions, "experience", "tailored_bullets"))
        .unwrap_or_else(|| original.experience.clone());

    let skills_value = field(suggestions, "skills", "tailored");
    let skills = skills_value
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| string_list(skills_value).map(|skills| skills.join(", ")))
        .unwrap_or_else(|| original.skills.clone());

    let changes = SectionChanges {
        summary: string_list(field(suggestions, "summary", "changes")).unwrap_or_default(),
        experience: string_list(field(suggestions, "experience", "changes")).unwrap_or_default(),
        skills: string_list(field(suggestions, "skills", "changes")).unwrap_or_default(),
    };

    TailoringResult {
        original,
        tailored: SectionSet { summary, experience, skills },
        changes,
    }
}
