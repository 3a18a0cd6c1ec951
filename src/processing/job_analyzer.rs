//! Job description analysis: keywords, skills, seniority, responsibilities

use crate::processing::text_processor::{char_window, extract_bullets, find_case_insensitive, TextProcessor};
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

const MAX_KEYWORDS: usize = 30;
const MAX_RESPONSIBILITIES: usize = 10;
const SKILL_WINDOW_CHARS: usize = 500;
const RESPONSIBILITY_WINDOW_CHARS: usize = 1000;

const REQUIRED_CUES: [&str; 4] = ["required", "must have", "qualifications", "requirements"];
const PREFERRED_CUES: [&str; 4] = ["preferred", "nice to have", "bonus", "plus"];
const RESPONSIBILITY_CUES: [&str; 4] = ["responsibilities", "duties", "you will", "job description"];

const SENIOR_CUES: [&str; 3] = ["senior", "7+ years", "8+ years"];
const MID_CUES: [&str; 3] = ["mid", "3-5 years", "4-6 years"];
const JUNIOR_CUES: [&str; 3] = ["junior", "entry", "0-2 years"];

/// Known technology and practice names, in reporting order.
pub const SKILL_VOCABULARY: [&str; 48] = [
    "python", "java", "javascript", "typescript", "react", "angular", "vue",
    "node", "nodejs", "express", "django", "flask", "fastapi", "sql", "nosql",
    "mongodb", "postgresql", "mysql", "redis", "docker", "kubernetes", "aws",
    "azure", "gcp", "git", "ci/cd", "jenkins", "terraform", "ansible",
    "machine learning", "deep learning", "ai", "data science", "pandas",
    "numpy", "tensorflow", "pytorch", "scikit-learn", "api", "rest", "graphql",
    "microservices", "agile", "scrum", "jira", "linux", "bash", "shell",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Senior")]
    Senior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    #[serde(rename = "Junior")]
    Junior,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl ExperienceLevel {
    /// Band for an explicit year count.
    pub fn from_years(years: u32) -> Self {
        match years {
            7.. => ExperienceLevel::Senior,
            3..=6 => ExperienceLevel::MidLevel,
            _ => ExperienceLevel::Junior,
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::Senior => write!(f, "Senior"),
            ExperienceLevel::MidLevel => write!(f, "Mid-level"),
            ExperienceLevel::Junior => write!(f, "Junior"),
            ExperienceLevel::NotSpecified => write!(f, "Not specified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub keywords: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub key_responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTier {
    Required,
    Preferred,
}

impl SkillTier {
    fn cues(&self) -> &'static [&'static str] {
        match self {
            SkillTier::Required => &REQUIRED_CUES,
            SkillTier::Preferred => &PREFERRED_CUES,
        }
    }
}

pub struct JobAnalyzer {
    text_processor: TextProcessor,
    skill_matcher: AhoCorasick,
    years_regex: Regex,
}

impl Default for JobAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl JobAnalyzer {
    pub fn new() -> Self {
        // Standard match kind so overlapping entries ("node"/"nodejs") all report.
        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(SKILL_VOCABULARY)
            .expect("Invalid skill vocabulary");

        let years_regex = Regex::new(r"(\d+)\+?\s*years?").expect("Invalid years regex");

        Self {
            text_processor: TextProcessor::new(),
            skill_matcher,
            years_regex,
        }
    }

    pub fn analyze(&self, job_text: &str) -> JobAnalysis {
        let analysis = JobAnalysis {
            keywords: self.extract_keywords(job_text),
            required_skills: self.extract_skills(job_text, SkillTier::Required),
            preferred_skills: self.extract_skills(job_text, SkillTier::Preferred),
            experience_level: self.extract_experience_level(job_text),
            key_responsibilities: self.extract_responsibilities(job_text),
        };

        debug!(
            "Job analysis: {} keywords, {} required, {} preferred, level {}",
            analysis.keywords.len(),
            analysis.required_skills.len(),
            analysis.preferred_skills.len(),
            analysis.experience_level
        );

        analysis
    }

    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        self.text_processor.extract_keywords(text, MAX_KEYWORDS)
    }

    /// Vocabulary skills found near the tier's first cue, or anywhere if no cue.
    pub fn extract_skills(&self, text: &str, tier: SkillTier) -> Vec<String> {
        let window = tier
            .cues()
            .iter()
            .find_map(|cue| find_case_insensitive(text, cue))
            .map(|start| char_window(text, start, SKILL_WINDOW_CHARS))
            .unwrap_or(text);

        let mut found = [false; SKILL_VOCABULARY.len()];
        for mat in self.skill_matcher.find_overlapping_iter(window) {
            found[mat.pattern().as_usize()] = true;
        }

        SKILL_VOCABULARY
            .iter()
            .zip(found)
            .filter(|(_, hit)| *hit)
            .map(|(skill, _)| skill.to_string())
            .collect()
    }

    pub fn extract_experience_level(&self, text: &str) -> ExperienceLevel {
        let text_lower = text.to_lowercase();
        let any = |cues: &[&str]| cues.iter().any(|cue| text_lower.contains(cue));

        if any(&SENIOR_CUES) {
            return ExperienceLevel::Senior;
        }
        if any(&MID_CUES) {
            return ExperienceLevel::MidLevel;
        }
        if any(&JUNIOR_CUES) {
            return ExperienceLevel::Junior;
        }

        self.years_regex
            .captures(&text_lower)
            .and_then(|caps| match caps[1].parse::<u32>() {
                Ok(years) => Some(years),
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
                Err(_) => None,
            })
            .map(ExperienceLevel::from_years)
            .unwrap_or(ExperienceLevel::NotSpecified)
    }

    pub fn extract_responsibilities(&self, text: &str) -> Vec<String> {
        for cue in RESPONSIBILITY_CUES {
            let Some(start) = find_case_insensitive(text, cue) else {
                continue;
            };

            let mut bullets = extract_bullets(char_window(text, start, RESPONSIBILITY_WINDOW_CHARS));
            if !bullets.is_empty() {
                bullets.truncate(MAX_RESPONSIBILITIES);
                return bullets;
            }
        }

        Vec::new()
    }
}
