//! Tailoring prompt and system instruction

use crate::processing::job_analyzer::JobAnalysis;
use crate::processing::sections::ResumeSections;
use regex::{Captures, Regex};

/// Number of job keywords embedded in the prompt.
const PROMPT_KEYWORDS: usize = 15;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert resume writer and ATS optimization specialist. \
Your job is to suggest improvements to resumes to better match job descriptions WITHOUT inventing \
experience or skills the candidate doesn't have. Focus on rewriting and reordering existing content \
to highlight relevant experience. Start bullets with strong action verbs that show ownership, \
quantify impact wherever the resume already gives numbers, rewrite passive phrasing in the active \
voice, and put the job's keywords first when the candidate genuinely has them.";

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub tailoring: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            tailoring: TAILORING_TEMPLATE.to_string(),
        }
    }
}

/// Values substituted into the tailoring template
#[derive(Debug, Clone)]
pub struct PromptParams {
    pub summary: String,
    pub experience: String,
    pub skills: String,
    pub keywords: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: String,
    pub responsibilities: Vec<String>,
}

impl PromptParams {
    pub fn new(sections: &ResumeSections, analysis: &JobAnalysis) -> Self {
        Self {
            summary: sections.summary.content.clone(),
            experience: sections.experience.content.clone(),
            skills: sections.skills.content.clone(),
            keywords: analysis.keywords.iter().take(PROMPT_KEYWORDS).cloned().collect(),
            required_skills: analysis.required_skills.clone(),
            preferred_skills: analysis.preferred_skills.clone(),
            experience_level: analysis.experience_level.to_string(),
            responsibilities: analysis.key_responsibilities.clone(),
        }
    }
}

fn or_na(text: &str) -> &str {
    if text.trim().is_empty() {
        "N/A"
    } else {
        text
    }
}

fn list_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}

impl PromptTemplates {
    /// Fill every `{placeholder}` in one pass over the template, so resume
    /// text that itself contains a placeholder is sent unchanged.
    pub fn render_tailoring(&self, params: &PromptParams) -> String {
        let placeholder = Regex::new(r"\{([a-z_]+)\}").expect("Invalid placeholder regex");

        placeholder
            .replace_all(&self.tailoring, |caps: &Captures| match &caps[1] {
                "summary" => or_na(&params.summary).to_string(),
                "experience" => or_na(&params.experience).to_string(),
                "skills" => or_na(&params.skills).to_string(),
                "keywords" => list_or_na(&params.keywords),
                "required_skills" => list_or_na(&params.required_skills),
                "preferred_skills" => list_or_na(&params.preferred_skills),
                "experience_level" => params.experience_level.clone(),
                "responsibilities" => list_or_na(&params.responsibilities),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

const TAILORING_TEMPLATE: &str = r#"Given the following resume sections and job analysis, suggest improvements to make the resume more ATS-friendly and better aligned with the job requirements.

IMPORTANT RULES:
1. DO NOT invent any experience, skills, or accomplishments
2. Only rewrite and reorder existing content
3. Use keywords from the job description where appropriate
4. Make bullet points more impactful and quantifiable
5. Focus on relevant experience

RESUME SECTIONS:
Summary: {summary}

Experience: {experience}

Skills: {skills}

JOB REQUIREMENTS:
Keywords: {keywords}
Required Skills: {required_skills}
Preferred Skills: {preferred_skills}
Experience Level: {experience_level}
Key Responsibilities: {responsibilities}

Respond with exactly one JSON object with the following structure:
{
  "summary": {
    "original": "original text",
    "tailored": "improved text",
    "changes": ["list of specific changes made"]
  },
  "experience": {
    "original_bullets": ["bullet 1", "bullet 2"],
    "tailored_bullets": ["improved bullet 1", "improved bullet 2"],
    "changes": ["list of specific changes made"]
  },
  "skills": {
    "original": "original skills text",
    "tailored": "reordered/emphasized skills text",
    "changes": ["list of specific changes made"]
  }
}"#;
