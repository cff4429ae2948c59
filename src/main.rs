//! Resume screener: rank resumes against a job description

use clap::Parser;
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, JobSource};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::input::InputManager;
use resume_screener::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_screener::processing::matcher::ResumeMatcher;
use resume_screener::processing::screener::ResumeScreener;
use resume_screener::{Result, ScreenerError};
use std::path::PathBuf;
use std::process;

const JOB_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "pdf", "docx", "doc"];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Screen {
            job,
            resumes,
            output,
            save,
            detailed,
            top_keywords,
            no_progress,
        } => {
            if let Some(format) = output {
                config.output.format = cli::parse_output_format(&format).map_err(ScreenerError::InvalidInput)?;
            }
            if detailed {
                config.output.detailed = true;
            }
            if let Some(top) = top_keywords {
                config.scoring.top_keywords = top;
            }

            let input_manager = InputManager::from_config(&config.extraction);
            let job_description = read_job(&input_manager, job).await?;

            info!("Starting resume screening");
            let screener = ResumeScreener::new(&config)?.with_progress(!no_progress);
            let report = screener.screen(&resumes, &job_description).await?;

            let generator = ReportGenerator::from_config(&config.output);
            let rendered = generator.generate_report(&report, &config.output.format)?;
            println!("{}", rendered);

            if let Some(path) = save {
                let path = if path.is_dir() {
                    path.join(suggest_filename(&config.output.format, true))
                } else {
                    path
                };
                // Colors never go to disk
                let content = if config.output.format == OutputFormat::Console {
                    ReportGenerator::with_options(false, config.output.detailed, true)
                        .generate_report(&report, &config.output.format)?
                } else {
                    rendered
                };
                save_report_to_file(&content, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Extract { file, raw } => {
            let document = InputManager::from_config(&config.extraction).parse(&file).await?;
            info!(
                "{} ({}, {}, {} words)",
                document.file_name,
                document.source_format,
                document.display_size(),
                document.word_count()
            );
            if raw {
                println!("{}", document.raw_text);
            } else {
                println!("{}", document.clean_text);
            }
        }

        Commands::Keywords { job, top } => {
            let input_manager = InputManager::from_config(&config.extraction);
            let job_description = read_job(&input_manager, job).await?;

            let matcher = ResumeMatcher::new(&config)?;
            let keywords = matcher.extract_keywords(&job_description, top.unwrap_or(config.scoring.top_keywords));
            if keywords.is_empty() {
                println!("No keywords found");
            }
            for (i, keyword) in keywords.iter().enumerate() {
                println!("{:>3}. {}", i + 1, keyword);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("# {}\n", config_path.display());
                println!("{}", content);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset to defaults: {}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(&key, &value)?;
                config.save_to(&config_path)?;
                println!("{} = {}", key, value);
            }
        },
    }

    Ok(())
}

async fn read_job(input_manager: &InputManager, source: JobSource) -> Result<String> {
    match (source.job, source.job_text) {
        (Some(path), _) => {
            cli::validate_file_extension(&path, JOB_EXTENSIONS)
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
            input_manager.read_job_description(&path).await
        }
        (None, Some(text)) if !text.trim().is_empty() => Ok(text),
        _ => Err(ScreenerError::InvalidInput("Job description is empty".to_string())),
    }
}
