//! Text extraction from various file formats

use crate::error::{Result, ResumeTailorError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeTailorError::DocumentExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        docx_text_from_bytes(&bytes).map_err(|e| {
            ResumeTailorError::DocumentExtraction(format!("Failed to extract text from DOCX '{}': {}", path.display(), e))
        })
    }
}

/// Paragraph texts of a DOCX package, one per line.
///
/// Within a paragraph, `<w:br/>` and `<w:cr/>` become `\n` and `<w:tab/>`
/// becomes `\t`, in document order. Page and column breaks add nothing.
pub fn docx_text_from_bytes(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let paragraph_regex = Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>")
        .expect("Invalid paragraph regex");
    // Only run content counts; `<w:tab>` inside `<w:pPr><w:tabs>` is a tab stop.
    let run_regex = Regex::new(r"(?s)<w:r(?:\s[^>]*)?>.*?</w:r>").expect("Invalid run regex");
    let run_content_regex = Regex::new(
        r#"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:(?:br|cr)(\s[^>]*)?/>|<w:tab(?:\s[^>]*)?/>"#,
    )
    .expect("Invalid run content regex");
    let break_type_regex = Regex::new(r#"w:type="([^"]*)""#).expect("Invalid break type regex");
    let entity_regex = Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#x[0-9a-fA-F]+);")
        .expect("Invalid entity regex");

    let paragraphs: Vec<String> = paragraph_regex
        .find_iter(&xml)
        .map(|paragraph| {
            let mut text = String::new();
            for run in run_regex.find_iter(paragraph.as_str()) {
                for caps in run_content_regex.captures_iter(run.as_str()) {
                    let token = &caps[0];
                    if let Some(run_text) = caps.get(1) {
                        text.push_str(&unescape_xml(&entity_regex, run_text.as_str()));
                    } else if token.starts_with("<w:tab") {
                        text.push('\t');
                    } else {
                        let is_line_break = caps
                            .get(2)
                            .and_then(|attrs| break_type_regex.captures(attrs.as_str()))
                            .map_or(true, |kind| &kind[1] == "textWrapping");
                        if is_line_break {
                            text.push('\n');
                        }
                    }
                }
            }
            text
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Decode the predefined entities and numeric character references in one pass.
fn unescape_xml(entity_regex: &Regex, text: &str) -> String {
    entity_regex
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .unwrap_or_else(|| entity[1..].parse::<u32>())
                    .ok()
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    /// Keeps list items as `- ` lines so bullets survive segmentation.
    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<li>", "- ")
            .replace("<br>", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let re = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
        let clean_text = re.replace_all(&text, "");

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}
