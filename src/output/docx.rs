//! DOCX export of the final resume
//!
//! Summary, experience and skills come from the tailored set when the user
//! accepted that section and from the original otherwise. Contact, education
//! and certifications are always the original text.

use crate::error::{Result, ResumeTailorError};
use crate::llm::tailor::SectionSet;
use crate::processing::sections::{ContactInfo, ResumeSections, SectionContent};
use askama::Template;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const EXPORT_FILENAME: &str = "tailored_resume.docx";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const RULE_WIDTH: usize = 80;
/// Half-point sizes.
const NAME_SIZE: u32 = 36;
const CONTACT_SIZE: u32 = 20;
const HEADING_SIZE: u32 = 28;
const RULE_SIZE: u32 = 16;
/// Twips: 0.5" top/bottom, 0.75" left/right.
const MARGIN_VERTICAL: u32 = 720;
const MARGIN_HORIZONTAL: u32 = 1080;

/// Which tailored sections the user accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedChanges {
    #[serde(default)]
    pub summary: bool,
    #[serde(default)]
    pub experience: bool,
    #[serde(default)]
    pub skills: bool,
}

/// Section text given either as plain text or as a segmented record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionText {
    Plain(String),
    Record(SectionContent),
}

impl SectionText {
    pub fn text(&self) -> &str {
        match self {
            SectionText::Plain(text) => text,
            SectionText::Record(section) => &section.content,
        }
    }
}

/// Original resume content supplied to an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub skills: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<SectionText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<SectionText>,
}

impl ResumeDraft {
    pub fn from_sections(sections: &ResumeSections) -> Self {
        let original = SectionSet::from_sections(sections);
        Self {
            contact: Some(sections.contact.clone()),
            summary: original.summary,
            experience: original.experience,
            skills: original.skills,
            education: Some(SectionText::Record(sections.education.clone())),
            certifications: Some(SectionText::Record(sections.certifications.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub original_sections: ResumeDraft,
    pub tailored_sections: SectionSet,
    #[serde(default)]
    pub accepted_changes: AcceptedChanges,
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
struct Paragraph {
    text: String,
    style: &'static str,
    centered: bool,
    bold: bool,
    color: &'static str,
    size: u32,
}

impl Paragraph {
    fn plain(text: &str) -> Self {
        Self {
            text: xml_text(text),
            ..Default::default()
        }
    }

    fn spacer() -> Self {
        Self::default()
    }

    fn has_properties(&self) -> bool {
        !self.style.is_empty() || self.centered
    }

    fn has_run_properties(&self) -> bool {
        self.bold || !self.color.is_empty() || self.size > 0
    }
}

#[derive(Template)]
#[template(source = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
{% for p in paragraphs %}<w:p>{% if p.has_properties() %}<w:pPr>{% if !p.style.is_empty() %}<w:pStyle w:val="{{ p.style }}"/>{% endif %}{% if p.centered %}<w:jc w:val="center"/>{% endif %}</w:pPr>{% endif %}{% if !p.text.is_empty() %}<w:r>{% if p.has_run_properties() %}<w:rPr>{% if p.bold %}<w:b/>{% endif %}{% if !p.color.is_empty() %}<w:color w:val="{{ p.color }}"/>{% endif %}{% if p.size > 0 %}<w:sz w:val="{{ p.size }}"/>{% endif %}</w:rPr>{% endif %}<w:t xml:space="preserve">{{ p.text }}</w:t></w:r>{% endif %}</w:p>
{% endfor %}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="{{ margin_vertical }}" w:right="{{ margin_horizontal }}" w:bottom="{{ margin_vertical }}" w:left="{{ margin_horizontal }}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>
</w:body>
</w:document>
"#, ext = "xml")]
struct DocumentTemplate {
    paragraphs: Vec<Paragraph>,
    margin_vertical: u32,
    margin_horizontal: u32,
}

#[derive(Template)]
#[template(source = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{{ title }}</dc:title>
<dc:creator>resume-tailor</dc:creator>
<dcterms:created xsi:type="dcterms:W3CDTF">{{ created }}</dcterms:created>
</cp:coreProperties>
"#, ext = "xml")]
struct CorePropertiesTemplate {
    title: String,
    created: String,
}

#[derive(Debug, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, original: &ResumeDraft, tailored: &SectionSet, accepted: &AcceptedChanges) -> Result<Vec<u8>> {
        let paragraphs = self.build_paragraphs(original, tailored, accepted);
        debug!("Rendering {} paragraphs", paragraphs.len());

        let document = DocumentTemplate {
            paragraphs,
            margin_vertical: MARGIN_VERTICAL,
            margin_horizontal: MARGIN_HORIZONTAL,
        }
        .render()?;

        let title = original
            .contact
            .as_ref()
            .map(|contact| contact.name.trim())
            .filter(|name| !name.is_empty())
            .map(xml_text)
            .unwrap_or_else(|| "Resume".to_string());
        let core = CorePropertiesTemplate {
            title,
            created: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
        .render()?;

        let bytes = package(&[
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", ROOT_RELS_XML),
            ("word/document.xml", &document),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
            ("word/styles.xml", STYLES_XML),
            ("word/numbering.xml", NUMBERING_XML),
            ("docProps/core.xml", &core),
        ])?;

        info!("Exported resume document ({} bytes)", bytes.len());
        Ok(bytes)
    }

    pub fn export_request(&self, request: &ExportRequest) -> Result<ExportedDocument> {
        let bytes = self.export(
            &request.original_sections,
            &request.tailored_sections,
            &request.accepted_changes,
        )?;

        Ok(ExportedDocument {
            filename: EXPORT_FILENAME,
            mime_type: DOCX_MIME_TYPE,
            bytes,
        })
    }

    fn build_paragraphs(&self, original: &ResumeDraft, tailored: &SectionSet, accepted: &AcceptedChanges) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();

        if let Some(contact) = &original.contact {
            push_contact(&mut paragraphs, contact);
        }

        let summary = if accepted.summary { &tailored.summary } else { &original.summary };
        push_text_section(&mut paragraphs, "PROFESSIONAL SUMMARY", summary);

        let experience = if accepted.experience { &tailored.experience } else { &original.experience };
        push_bullet_section(&mut paragraphs, "PROFESSIONAL EXPERIENCE", experience);

        let skills = if accepted.skills { &tailored.skills } else { &original.skills };
        push_text_section(&mut paragraphs, "SKILLS", skills);

        if let Some(education) = &original.education {
            push_text_section(&mut paragraphs, "EDUCATION", education.text());
        }
        if let Some(certifications) = &original.certifications {
            push_text_section(&mut paragraphs, "CERTIFICATIONS", certifications.text());
        }

        paragraphs
    }
}

fn push_contact(paragraphs: &mut Vec<Paragraph>, contact: &ContactInfo) {
    let name = contact.name.trim();
    let details: Vec<&str> = [&contact.email, &contact.phone, &contact.linkedin]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect();

    if name.is_empty() && details.is_empty() {
        return;
    }

    if !name.is_empty() {
        paragraphs.push(Paragraph {
            text: xml_text(name),
            style: "Heading1",
            centered: true,
            color: "000000",
            size: NAME_SIZE,
            ..Default::default()
        });
    }

    if !details.is_empty() {
        paragraphs.push(Paragraph {
            text: xml_text(&details.join(" | ")),
            centered: true,
            size: CONTACT_SIZE,
            ..Default::default()
        });
    }

    paragraphs.push(Paragraph::spacer());
}

fn push_heading(paragraphs: &mut Vec<Paragraph>, title: &str) {
    paragraphs.push(Paragraph {
        text: xml_text(title),
        style: "Heading2",
        bold: true,
        color: "000000",
        size: HEADING_SIZE,
        ..Default::default()
    });
    paragraphs.push(Paragraph {
        text: "_".repeat(RULE_WIDTH),
        color: "646464",
        size: RULE_SIZE,
        ..Default::default()
    });
}

fn push_text_section(paragraphs: &mut Vec<Paragraph>, title: &str, content: &str) {
    if content.trim().is_empty() {
        return;
    }

    push_heading(paragraphs, title);
    paragraphs.extend(
        content
            .split(['\n', '\r', LINE_TABULATION, FORM_FEED])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Paragraph::plain),
    );
    paragraphs.push(Paragraph::spacer());
}

fn push_bullet_section(paragraphs: &mut Vec<Paragraph>, title: &str, bullets: &[String]) {
    let bullets: Vec<&str> = bullets
        .iter()
        .map(|bullet| bullet.trim())
        .filter(|bullet| !bullet.is_empty())
        .collect();
    if bullets.is_empty() {
        return;
    }

    push_heading(paragraphs, title);
    paragraphs.extend(bullets.into_iter().map(|bullet| Paragraph {
        style: "ListBullet",
        ..Paragraph::plain(bullet)
    }));
    paragraphs.push(Paragraph::spacer());
}

/// Manual line and page breaks pasted from Word.
const LINE_TABULATION: char = '\u{0B}';
const FORM_FEED: char = '\u{0C}';

/// Text safe inside `<w:t>`: breaks left inside a single paragraph become
/// spaces and characters XML 1.0 does not allow are dropped.
fn xml_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == LINE_TABULATION || c == FORM_FEED { ' ' } else { c })
        .filter(|&c| is_xml_char(c))
        .collect()
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn package(parts: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        writer
            .start_file(*name, options)
            .map_err(|e| ResumeTailorError::Export(format!("Failed to add {}: {}", name, e)))?;
        writer.write_all(content.as_bytes())?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ResumeTailorError::Export(format!("Failed to finish package: {}", e)))?;
    Ok(cursor.into_inner())
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>
"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>
"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>
"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="80"/></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="40"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:style>
</w:styles>
"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::text_extractor::docx_text_from_bytes;

    fn draft() -> ResumeDraft {
        ResumeDraft {
            contact: Some(ContactInfo {
                name: "Jane Roe".to_string(),
                email: Some("jane@example.com".to_string()),
                phone: None,
                linkedin: Some("linkedin.com/in/jane".to_string()),
            }),
            summary: "Summary\nBackend engineer.".to_string(),
            experience: vec!["Built APIs".to_string(), "  ".to_string(), "Ran on-call".to_string()],
            skills: "Rust, SQL".to_string(),
            education: Some(SectionText::Plain("B.S. Computer Science".to_string())),
            certifications: Some(SectionText::Record(SectionContent {
                content: "Certifications\nCKA".to_string(),
                bullets: vec![],
            })),
        }
    }

    fn tailored() -> SectionSet {
        SectionSet {
            summary: "Backend engineer who ships.".to_string(),
            experience: vec!["Owned API design".to_string()],
            skills: "SQL, Rust".to_string(),
        }
    }

    fn texts(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_section_order_and_layout() {
        let paragraphs = DocxExporter::new().build_paragraphs(&draft(), &tailored(), &AcceptedChanges::default());
        let rule = "_".repeat(RULE_WIDTH);

        assert_eq!(
            texts(&paragraphs),
            vec![
                "Jane Roe",
                "jane@example.com | linkedin.com/in/jane",
                "",
                "PROFESSIONAL SUMMARY",
                rule.as_str(),
                "Summary",
                "Backend engineer.",
                "",
                "PROFESSIONAL EXPERIENCE",
                rule.as_str(),
                "Built APIs",
                "Ran on-call",
                "",
                "SKILLS",
                rule.as_str(),
                "Rust, SQL",
                "",
                "EDUCATION",
                rule.as_str(),
                "B.S. Computer Science",
                "",
                "CERTIFICATIONS",
                rule.as_str(),
                "Certifications",
                "CKA",
                "",
            ]
        );
        assert_eq!(paragraphs[10].style, "ListBullet");
        assert!(paragraphs[0].centered);
    }

    #[test]
    fn test_accepted_sections_use_tailored_content() {
        let accepted = AcceptedChanges {
            summary: true,
            experience: true,
            skills: false,
        };
        let paragraphs = DocxExporter::new().build_paragraphs(&draft(), &tailored(), &accepted);
        let texts = texts(&paragraphs);

        assert!(texts.contains(&"Backend engineer who ships."));
        assert!(texts.contains(&"Owned API design"));
        assert!(!texts.contains(&"Built APIs"));
        assert!(texts.contains(&"Rust, SQL"));
        assert!(!texts.contains(&"SQL, Rust"));
    }

    #[test]
    fn test_blank_sections_are_omitted() {
        let original = ResumeDraft {
            summary: "   \n ".to_string(),
            experience: vec![" ".to_string()],
            ..Default::default()
        };
        let paragraphs = DocxExporter::new().build_paragraphs(&original, &tailored(), &AcceptedChanges::default());
        assert!(paragraphs.is_empty());
    }

    #[test]
    fn test_contact_never_comes_from_tailored() {
        let mut original = draft();
        original.contact = None;
        let paragraphs = DocxExporter::new().build_paragraphs(
            &original,
            &tailored(),
            &AcceptedChanges { summary: true, experience: true, skills: true },
        );
        assert_eq!(paragraphs[0].text, "PROFESSIONAL SUMMARY");
    }

    #[test]
    fn test_export_produces_readable_package() {
        let mut original = draft();
        original.skills = "C++ & <Rust>".to_string();

        let bytes = DocxExporter::new()
            .export(&original, &tailored(), &AcceptedChanges::default())
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        for part in ["[Content_Types].xml", "_rels/.rels", "word/styles.xml", "word/numbering.xml", "docProps/core.xml"] {
            assert!(archive.by_name(part).is_ok(), "missing part {}", part);
        }

        let text = docx_text_from_bytes(&bytes).unwrap();
        assert!(text.starts_with("Jane Roe\n"));
        assert!(text.contains("\nC++ & <Rust>\n"));
    }

    #[test]
    fn test_control_characters_never_reach_document_xml() {
        let mut original = draft();
        original.summary = "Line A\u{0B}Line B\u{0C}Line C".to_string();
        original.experience = vec!["Built\u{0B}APIs\u{01}".to_string()];
        if let Some(contact) = original.contact.as_mut() {
            contact.name = "Jane\u{08} Roe".to_string();
        }

        let bytes = DocxExporter::new()
            .export(&original, &tailored(), &AcceptedChanges::default())
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        for part in ["word/document.xml", "docProps/core.xml"] {
            let mut xml = String::new();
            std::io::Read::read_to_string(&mut archive.by_name(part).unwrap(), &mut xml).unwrap();
            assert!(xml.chars().all(is_xml_char), "forbidden character in {}", part);
        }

        let text = docx_text_from_bytes(&bytes).unwrap();
        assert!(text.starts_with("Jane Roe\n"));
        assert!(text.contains("\nLine A\nLine B\nLine C\n"));
        assert!(text.contains("\nBuilt APIs\n"));
    }

    #[test]
    fn test_section_text_deserializes_both_shapes() {
        let plain: SectionText = serde_json::from_str(r#""B.S. Math""#).unwrap();
        let record: SectionText = serde_json::from_str(r#"{"content": "Education\nB.S. Math", "bullets": []}"#).unwrap();

        assert_eq!(plain.text(), "B.S. Math");
        assert_eq!(record.text(), "Education\nB.S. Math");
    }
}
