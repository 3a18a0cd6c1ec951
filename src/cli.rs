//! CLI interface for the resume tailor

use crate::output::docx::AcceptedChanges;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Parse resumes, analyze job descriptions and tailor resumes to a target job")]
#[command(long_about = "Segment resumes into sections, extract keywords and skills from job descriptions, \
generate tailored suggestions with a language model (or a deterministic fallback) and export the result as DOCX")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: console, json (defaults to the configured format)
    #[arg(short, long, global = true)]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Segment a resume into sections
    #[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
    Parse {
        /// Read pasted resume text from a file
        #[arg(short, long)]
        text: Option<PathBuf>,

        /// Resume document to upload (DOCX, PDF)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Extract keywords, skills and seniority from a job description
    Analyze {
        /// Path to job description file (TXT, MD, DOCX, PDF)
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Generate tailored resume suggestions for a job description
    Tailor {
        /// Path to resume file (TXT, MD, DOCX, PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, DOCX, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Write an export request for the `export` command
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Render an export request as a DOCX document
    Export {
        /// Export request JSON written by `tailor --save`
        #[arg(short, long)]
        request: PathBuf,

        /// Sections whose tailored version is accepted (overrides the request)
        #[arg(short, long, value_enum)]
        accept: Vec<AcceptArg>,

        /// Output path for the document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AcceptArg {
    Summary,
    Experience,
    Skills,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Fold `--accept` flags into acceptance choices.
pub fn accepted_changes(args: &[AcceptArg]) -> AcceptedChanges {
    AcceptedChanges {
        summary: args.contains(&AcceptArg::Summary),
        experience: args.contains(&AcceptArg::Experience),
        skills: args.contains(&AcceptArg::Skills),
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
