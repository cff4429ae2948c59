//! Output formatters for screening reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, ScreenerError};
use crate::output::report::{MatchResult, ScreeningReport};
use colored::{Color, Colorize};
use std::path::Path;

/// Renders a screening report in one output format
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
}

/// Ranked table for the terminal
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Spreadsheet-friendly rows, one per resume
pub struct CsvFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    csv_formatter: CsvFormatter,
}

const CSV_HEADER: [&str; 7] = [
    "Resume",
    "Score",
    "Similarity",
    "Keyword_Coverage",
    "Matched_Keywords",
    "Total_Keywords",
    "File_Size",
];

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 80.0 => ("STRONG", Color::Green),
            s if s >= 60.0 => ("GOOD", Color::BrightGreen),
            s if s >= 40.0 => ("FAIR", Color::Yellow),
            s if s >= 20.0 => ("WEAK", Color::BrightRed),
            _ => ("POOR", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_row(&self, rank: usize, result: &MatchResult, name_width: usize) -> String {
        let score = format!("{:>6.2}", result.score);
        let score = if result.error.is_some() {
            self.colorize(&score, Color::BrightBlack)
        } else {
            score
        };

        format!(
            "{:>4}  {:<width$}  {}  {:>10.2}  {:>8}  {:>10}  {}\n",
            rank,
            truncate(&result.file_name, name_width),
            score,
            result.similarity_score,
            result.keyword_summary(),
            result.file_size,
            self.format_score_badge(result.score),
            width = name_width
        )
    }

    fn format_details(&self, result: &MatchResult) -> String {
        let mut output = format!(
            "{} ({:.1}% keyword coverage)\n",
            self.colorize(&result.file_name, Color::Cyan),
            result.keyword_coverage
        );

        if let Some(error) = &result.error {
            output.push_str(&format!("  {}\n", self.colorize(error, Color::Red)));
        } else if result.matched_keywords.is_empty() {
            output.push_str("  No job keywords found\n");
        } else {
            output.push_str(&format!(
                "  Matched: {}\n",
                self.colorize(&result.matched_keywords.join(", "), Color::Green)
            ));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms | Resumes scored: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms,
            report.results.len()
        ));

        if !report.job_keywords.is_empty() {
            output.push_str(&format!(
                "Job keywords: {}\n",
                self.colorize(&report.job_keywords.join(", "), Color::Cyan)
            ));
        }

        output.push_str(&self.format_header("Ranking", 2));
        let name_width = report
            .results
            .iter()
            .map(|r| r.file_name.chars().count())
            .max()
            .unwrap_or(6)
            .clamp(6, 40);

        output.push_str(&format!(
            "{:>4}  {:<width$}  {:>6}  {:>10}  {:>8}  {:>10}\n",
            "Rank",
            "Resume",
            "Score",
            "Similarity",
            "Keywords",
            "Size",
            width = name_width
        ));
        output.push_str(&format!("{}\n", "-".repeat(name_width + 48)));

        for (i, result) in report.results.iter().enumerate() {
            output.push_str(&self.format_row(i + 1, result, name_width));
        }

        if let Some(best) = report.best_match() {
            output.push_str(&format!(
                "\nBest match: {} ({:.2}) | Average score: {:.2}\n",
                self.colorize(&best.file_name, Color::Green),
                best.score,
                report.average_score()
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Keyword Details", 2));
            for result in &report.results {
                output.push_str(&self.format_details(result));
            }
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("Warnings", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  • {} {}\n",
                    self.colorize(&failure.file_name, Color::Yellow),
                    self.colorize(
                        &format!("({} failed: {})", failure.stage, failure.error),
                        Color::BrightBlack
                    )
                ));
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;

        for result in &report.results {
            writer.write_record([
                result.file_name.clone(),
                format!("{:.2}", result.score),
                format!("{:.2}", result.similarity_score),
                format!("{:.2}", result.keyword_coverage),
                result.matched_keywords.join(", "),
                result.total_keywords.to_string(),
                result.file_size.clone(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ScreenerError::OutputFormatting(format!("Cannot finish CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::OutputFormatting(e.to_string()))
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            csv_formatter: CsvFormatter,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true)
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Csv => self.csv_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        ScreenerError::OutputFormatting(format!("Cannot write {}: {}", file_path.display(), e))
    })
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!("resume_analysis_results{}.{}", timestamp_suffix, format.extension())
}
