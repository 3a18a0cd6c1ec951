//! Heuristic resume segmentation
//!
//! Splits unstructured resume text into labeled sections by looking for short
//! header lines that mention a section name. This is keyword matching, not a
//! grammar: a bullet that mentions "skills" inside the experience block can
//! end that block early, and that behavior is kept as-is.

use crate::processing::sections::{ContactInfo, ResumeSections, SectionContent, SectionKind};
use crate::processing::text_processor::bullet_text;
use log::debug;
use regex::Regex;

/// Header lines are shorter than this many characters.
const MAX_HEADER_CHARS: usize = 50;

/// Words that close whatever section is currently open.
const COMMON_HEADERS: [&str; 9] = [
    "experience", "education", "skills", "summary", "objective",
    "certifications", "projects", "awards", "publications",
];

pub struct SectionSegmenter {
    email_regex: Regex,
    phone_regex: Regex,
    linkedin_regex: Regex,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSegmenter {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"[+]?[(]?\d{1,3}[)]?[-\s.]?\d{3}[-\s.]?\d{4}")
            .expect("Invalid phone regex");

        let linkedin_regex = Regex::new(r"(?i)linkedin\.com/in/[\w-]+")
            .expect("Invalid LinkedIn regex");

        Self {
            email_regex,
            phone_regex,
            linkedin_regex,
        }
    }

    /// Split resume text into sections. Never fails.
    pub fn segment(&self, text: &str) -> ResumeSections {
        let lines: Vec<&str> = text.lines().collect();

        let mut sections = ResumeSections {
            contact: self.extract_contact(text),
            ..Default::default()
        };

        for kind in SectionKind::ALL {
            let section = extract_section(&lines, kind.synonyms());
            debug!(
                "Section {}: {} characters, {} bullets",
                kind,
                section.content.len(),
                section.bullets.len()
            );
            *sections.section_mut(kind) = section;
        }

        sections
    }

    /// Email, phone and LinkedIn by first match; name from the first non-empty line.
    pub fn extract_contact(&self, text: &str) -> ContactInfo {
        let first_match = |regex: &Regex| regex.find(text).map(|m| m.as_str().to_string());

        ContactInfo {
            name: text
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string(),
            email: first_match(&self.email_regex),
            phone: first_match(&self.phone_regex),
            linkedin: first_match(&self.linkedin_regex),
        }
    }
}

fn is_short(line: &str) -> bool {
    line.trim().chars().count() < MAX_HEADER_CHARS
}

fn mentions_any(line_lower: &str, words: &[&str]) -> bool {
    words.iter().any(|word| line_lower.contains(word))
}

/// Extract the block opened by the first short line naming one of `synonyms`.
pub fn extract_section(lines: &[&str], synonyms: &[&str]) -> SectionContent {
    let start = lines.iter().position(|line| {
        let line_lower = line.trim().to_lowercase();
        mentions_any(&line_lower, synonyms) && is_short(line)
    });

    let Some(start) = start else {
        return SectionContent::default();
    };

    // The section's own synonyms never terminate it.
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| {
            let line_lower = line.trim().to_lowercase();
            !line_lower.is_empty()
                && is_short(line)
                && mentions_any(&line_lower, &COMMON_HEADERS)
                && !mentions_any(&line_lower, synonyms)
        })
        .map(|(idx, _)| idx)
        .unwrap_or(lines.len());

    let section_lines = &lines[start..end];

    SectionContent {
        content: section_lines.join("\n").trim().to_string(),
        bullets: section_lines.iter().copied().filter_map(bullet_text).collect(),
    }
}
