//! CLI interface for the resume screener

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Rank resumes against a job description")]
#[command(long_about = "Screen a batch of PDF/Word resumes against one job description using TF-IDF similarity and keyword coverage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Where the job description comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct JobSource {
    /// Path to job description file (TXT, MD, PDF, DOCX)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description passed inline
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and rank resumes against a job description
    Screen {
        #[command(flatten)]
        job: JobSource,

        /// Resume files (PDF, DOCX, DOC)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Output format: console, json, csv
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show matched keywords for every resume
        #[arg(short, long)]
        detailed: bool,

        /// Number of job keywords to match against
        #[arg(long)]
        top_keywords: Option<usize>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Extract and print the text of a single resume
    Extract {
        /// Path to resume file
        file: PathBuf,

        /// Print the raw text instead of the cleaned text
        #[arg(long)]
        raw: bool,
    },

    /// Show the ranked keywords of a job description
    Keywords {
        #[command(flatten)]
        job: JobSource,

        /// Number of keywords to show
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.keyword_weight")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, csv", format)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("CSV"), Ok(OutputFormat::Csv));
        assert_eq!(parse_output_format("json"), Ok(OutputFormat::Json));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_screen_requires_one_job_source() {
        let parsed = Cli::try_parse_from(["resume-screener", "screen", "a.pdf"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "resume-screener", "screen", "--job", "jd.txt", "--job-text", "rust", "a.pdf",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "resume-screener", "screen", "--job-text", "Rust developer", "a.pdf", "b.docx",
        ])
        .unwrap();
        match parsed.command {
            Commands::Screen { job, resumes, .. } => {
                assert_eq!(job.job_text.as_deref(), Some("Rust developer"));
                assert_eq!(resumes.len(), 2);
            }
            _ => panic!("expected screen command"),
        }
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["txt", "md"];
        assert!(validate_file_extension(Path::new("job.TXT"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("job.pdf"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("job"), &allowed).is_err());
    }
}
