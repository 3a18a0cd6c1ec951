//! Output formatters for the command line

use crate::config::OutputFormat;
use crate::error::{Result, ResumeTailorError};
use crate::llm::tailor::{SectionChanges, SectionSet, TailoringOutcome};
use crate::processing::job_analyzer::JobAnalysis;
use crate::processing::sections::{ParsedResume, SectionKind};
use colored::{Color, Colorize};

/// Renders each command's result as text.
pub trait OutputFormatter {
    fn format_parsed(&self, parsed: &ParsedResume) -> Result<String>;
    fn format_analysis(&self, analysis: &JobAnalysis) -> Result<String>;
    fn format_tailoring(&self, outcome: &TailoringOutcome) -> Result<String>;
}

/// Build the formatter for a configured output format.
pub fn formatter_for(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| ResumeTailorError::OutputFormatting(format!("JSON serialization failed: {}", e)))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_parsed(&self, parsed: &ParsedResume) -> Result<String> {
        self.to_json(parsed)
    }

    fn format_analysis(&self, analysis: &JobAnalysis) -> Result<String> {
        self.to_json(analysis)
    }

    fn format_tailoring(&self, outcome: &TailoringOutcome) -> Result<String> {
        self.to_json(outcome)
    }
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_list(&self, items: &[String]) -> String {
        if items.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }
        items.iter().map(|item| format!("  • {}\n", item)).collect()
    }

    fn format_block(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return format!("  {}\n", self.colorize("(empty)", Color::BrightBlack));
        }
        text.lines().map(|line| format!("  {}\n", line)).collect()
    }

    fn format_section_set(&self, set: &SectionSet) -> String {
        let mut output = String::new();
        output.push_str(&self.colorize("Summary:\n", Color::Cyan));
        output.push_str(&self.format_block(&set.summary));
        output.push_str(&self.colorize("Experience:\n", Color::Cyan));
        output.push_str(&self.format_list(&set.experience));
        output.push_str(&self.colorize("Skills:\n", Color::Cyan));
        output.push_str(&self.format_block(&set.skills));
        output
    }

    fn format_changes(&self, changes: &SectionChanges) -> String {
        let mut output = String::new();
        for (name, items) in [
            ("Summary", &changes.summary),
            ("Experience", &changes.experience),
            ("Skills", &changes.skills),
        ] {
            output.push_str(&self.colorize(&format!("{}:\n", name), Color::Cyan));
            output.push_str(&self.format_list(items));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_parsed(&self, parsed: &ParsedResume) -> Result<String> {
        let mut output = self.format_header("PARSED RESUME", 1);

        if let Some(filename) = &parsed.filename {
            output.push_str(&format!("File: {}\n", filename));
        }

        let contact = &parsed.sections.contact;
        output.push_str(&self.format_header("Contact", 2));
        output.push_str(&format!("  Name:     {}\n", contact.name));
        for (label, value) in [("Email", &contact.email), ("Phone", &contact.phone), ("LinkedIn", &contact.linkedin)] {
            let value = value.as_deref().unwrap_or("-");
            output.push_str(&format!("  {:<9} {}\n", format!("{}:", label), value));
        }

        for kind in SectionKind::ALL {
            let section = parsed.sections.section(kind);
            let title = format!("{} ({} bullets)", kind, section.bullets.len());
            output.push_str(&self.format_header(&title, 2));
            output.push_str(&self.format_block(&section.content));
        }

        Ok(output)
    }

    fn format_analysis(&self, analysis: &JobAnalysis) -> Result<String> {
        let mut output = self.format_header("JOB ANALYSIS", 1);

        output.push_str(&format!(
            "Experience level: {}\n",
            self.colorize(&analysis.experience_level.to_string(), Color::Magenta)
        ));

        output.push_str(&self.format_header("Keywords", 2));
        output.push_str(&format!("  {}\n", analysis.keywords.join(", ")));
        output.push_str(&self.format_header("Required skills", 2));
        output.push_str(&self.format_list(&analysis.required_skills));
        output.push_str(&self.format_header("Preferred skills", 2));
        output.push_str(&self.format_list(&analysis.preferred_skills));
        output.push_str(&self.format_header("Key responsibilities", 2));
        output.push_str(&self.format_list(&analysis.key_responsibilities));

        Ok(output)
    }

    fn format_tailoring(&self, outcome: &TailoringOutcome) -> Result<String> {
        let mut output = self.format_header("TAILORED RESUME", 1);

        match outcome.degrade_reason() {
            None => output.push_str(&format!("{}\n", self.colorize("Generated suggestions", Color::Green))),
            Some(reason) => output.push_str(&format!(
                "{} {}\n",
                self.colorize("Deterministic fallback:", Color::Yellow),
                reason
            )),
        }

        let result = outcome.result();
        output.push_str(&self.format_header("Original", 2));
        output.push_str(&self.format_section_set(&result.original));
        output.push_str(&self.format_header("Tailored", 2));
        output.push_str(&self.format_section_set(&result.tailored));
        output.push_str(&self.format_header("Changes", 2));
        output.push_str(&self.format_changes(&result.changes));

        Ok(output)
    }
}
