//! Resume tailor: parse resumes, analyze jobs, tailor and export

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_tailor::cli::{self, Cli, Commands, ConfigAction};
use resume_tailor::config::{Config, OutputFormat};
use resume_tailor::input::file_detector::FileType;
use resume_tailor::input::InputManager;
use resume_tailor::output::docx::{ExportRequest, ResumeDraft, EXPORT_FILENAME};
use resume_tailor::output::formatter::formatter_for;
use resume_tailor::service::{ResumeService, Upload};
use resume_tailor::{Result, ResumeTailorError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let format = match &cli.format {
        Some(format) => cli::parse_output_format(format).map_err(ResumeTailorError::InvalidInput)?,
        None => config.output.format,
    };
    let formatter = formatter_for(format, config.output.color_output);
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Parse { text, file } => {
            let service = ResumeService::new(None);
            let input = InputManager::new();

            let text = match &text {
                Some(path) => Some(input.extract_text(path).await?),
                None => None,
            };
            let upload = match &file {
                Some(path) => Some(read_upload(path).await?),
                None => None,
            };

            let parsed = service.parse_resume(text, upload).await?;
            println!("{}", formatter.format_parsed(&parsed)?);
        }

        Commands::Analyze { job } => {
            let job_text = InputManager::new().extract_text(&job).await?;
            let analysis = ResumeService::new(None).analyze_job(&job_text);
            println!("{}", formatter.format_analysis(&analysis)?);
        }

        Commands::Tailor { resume, job, save } => {
            let service = ResumeService::from_config(&config)?;
            let resume_text = resume_source(&service, &resume).await?;
            let job_text = InputManager::new().extract_text(&job).await?;

            let spinner = (format == OutputFormat::Console && service.has_generator()).then(|| {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(ProgressStyle::default_spinner());
                spinner.set_message("Generating tailored suggestions...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            });

            let outcome = service.tailor_resume(&resume_text, &job_text).await;

            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            if let Some(reason) = outcome.degrade_reason() {
                warn!("Showing deterministic suggestions: {}", reason);
            }

            println!("{}", formatter.format_tailoring(&outcome)?);

            if let Some(save_path) = save {
                let parsed = service.parse_resume(Some(resume_text), None).await?;
                let request = ExportRequest {
                    original_sections: ResumeDraft::from_sections(&parsed.sections),
                    tailored_sections: outcome.into_result().tailored,
                    accepted_changes: Default::default(),
                };
                let json = serde_json::to_string_pretty(&request)?;
                tokio::fs::write(&save_path, json).await?;
                info!("Export request saved to {}", save_path.display());
            }
        }

        Commands::Export { request, accept, output } => {
            let content = tokio::fs::read_to_string(&request).await?;
            let mut request: ExportRequest = serde_json::from_str(&content)?;
            if !accept.is_empty() {
                request.accepted_changes = cli::accepted_changes(&accept);
            }

            let document = ResumeService::new(None).export_resume(&request)?;
            let output = output.unwrap_or_else(|| PathBuf::from(document.filename));
            tokio::fs::write(&output, &document.bytes).await?;

            println!("✅ Wrote {} ({} bytes, {})", output.display(), document.bytes.len(), document.mime_type);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Model: {}", config.llm.model);
                println!("Endpoint: {}", config.llm.base_url);
                println!("Temperature: {}", config.llm.temperature);
                println!("Max tokens: {}", config.llm.max_tokens);
                println!("Timeout: {}s", config.llm.timeout_secs);
                println!(
                    "Credential: {}",
                    if config.llm.has_credential() { "configured" } else { "not set (deterministic fallback)" }
                );
                println!("Output format: {:?}", config.output.format);
                println!("Default export file: {}", EXPORT_FILENAME);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(&config_path)?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

/// Resume text for tailoring: text files are read as-is, documents are
/// decoded through the upload path.
async fn resume_source(service: &ResumeService, path: &Path) -> Result<String> {
    if FileType::from_path(path).is_document() {
        let parsed = service.parse_resume(None, Some(read_upload(path).await?)).await?;
        Ok(parsed.raw_text)
    } else {
        InputManager::new().extract_text(path).await
    }
}

async fn read_upload(path: &Path) -> Result<Upload> {
    cli::validate_file_extension(path, &["docx", "pdf"])
        .map_err(|e| ResumeTailorError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;

    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume")
        .to_string();

    Ok(Upload::new(filename, bytes))
}
