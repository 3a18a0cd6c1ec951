//! Structured resume model produced by the segmenter

use serde::{Deserialize, Serialize};

/// Contact block. Only `name` is always set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Text of one resume section plus the bullets found inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl SectionContent {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.bullets.is_empty()
    }
}

/// All sections of a parsed resume. Missing sections are empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub contact: ContactInfo,
    pub summary: SectionContent,
    pub experience: SectionContent,
    pub education: SectionContent,
    pub skills: SectionContent,
    pub certifications: SectionContent,
    pub projects: SectionContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Certifications,
        SectionKind::Projects,
    ];

    /// Header phrases that open this section.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            SectionKind::Summary => &["summary", "objective", "profile"],
            SectionKind::Experience => &["experience", "work experience", "employment", "work history"],
            SectionKind::Education => &["education", "academic background"],
            SectionKind::Skills => &["skills", "technical skills", "competencies"],
            SectionKind::Certifications => &["certifications", "certificates", "licenses"],
            SectionKind::Projects => &["projects", "personal projects"],
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Summary => write!(f, "Summary"),
            SectionKind::Experience => write!(f, "Experience"),
            SectionKind::Education => write!(f, "Education"),
            SectionKind::Skills => write!(f, "Skills"),
            SectionKind::Certifications => write!(f, "Certifications"),
            SectionKind::Projects => write!(f, "Projects"),
        }
    }
}

impl ResumeSections {
    pub fn section(&self, kind: SectionKind) -> &SectionContent {
        match kind {
            SectionKind::Summary => &self.summary,
            SectionKind::Experience => &self.experience,
            SectionKind::Education => &self.education,
            SectionKind::Skills => &self.skills,
            SectionKind::Certifications => &self.certifications,
            SectionKind::Projects => &self.projects,
        }
    }

    pub(crate) fn section_mut(&mut self, kind: SectionKind) -> &mut SectionContent {
        match kind {
            SectionKind::Summary => &mut self.summary,
            SectionKind::Experience => &mut self.experience,
            SectionKind::Education => &mut self.education,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Certifications => &mut self.certifications,
            SectionKind::Projects => &mut self.projects,
        }
    }
}

/// Parse response: sections plus the identity of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub raw_text: String,
    pub sections: ResumeSections,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_serialize_all_keys() {
        let value = serde_json::to_value(ResumeSections::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in ["contact", "summary", "experience", "education", "skills", "certifications", "projects"] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(value["summary"]["content"], "");
        assert_eq!(value["experience"]["bullets"], serde_json::json!([]));
    }

    #[test]
    fn test_contact_omits_absent_fields() {
        let contact = ContactInfo {
            name: "Jane Roe".to_string(),
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Jane Roe", "email": "jane@example.com"}));
    }
}
