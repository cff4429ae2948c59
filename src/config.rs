//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub processing: ProcessingConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Recover raw text runs from legacy `.doc` files the structured reader rejects
    pub legacy_doc_fallback: bool,
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub smooth_idf: bool,
    pub sublinear_tf: bool,
    pub min_token_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub similarity_weight: f64,
    pub keyword_weight: f64,
    pub top_keywords: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            legacy_doc_fallback: true,
            max_file_size_mb: 20,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 2,
            smooth_idf: true,
            sublinear_tf: false,
            min_token_length: 2,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.6,
            keyword_weight: 0.4,
            top_keywords: 20,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl Config {
    /// Load from an explicit path, writing defaults there if the file does not exist yet
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        if scoring.similarity_weight < 0.0 || scoring.keyword_weight < 0.0 {
            return Err(ScreenerError::Configuration(
                "Scoring weights must be non-negative".to_string(),
            ));
        }
        if (scoring.similarity_weight + scoring.keyword_weight - 1.0).abs() > 1e-6 {
            return Err(ScreenerError::Configuration(format!(
                "Scoring weights must sum to 1.0 (similarity {} + keyword {})",
                scoring.similarity_weight, scoring.keyword_weight
            )));
        }
        if scoring.top_keywords == 0 {
            return Err(ScreenerError::Configuration(
                "scoring.top_keywords must be at least 1".to_string(),
            ));
        }

        let processing = &self.processing;
        if processing.ngram_min == 0 || processing.ngram_min > processing.ngram_max {
            return Err(ScreenerError::Configuration(format!(
                "Invalid n-gram range ({}, {})",
                processing.ngram_min, processing.ngram_max
            )));
        }

        if self.extraction.max_file_size_mb == 0 {
            return Err(ScreenerError::Configuration(
                "extraction.max_file_size_mb must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Update one dotted key (e.g. `scoring.keyword_weight`) from its string form.
    /// The configuration is validated afterwards and left untouched on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();

        match key {
            "extraction.legacy_doc_fallback" => updated.extraction.legacy_doc_fallback = parse_value(key, value)?,
            "extraction.max_file_size_mb" => updated.extraction.max_file_size_mb = parse_value(key, value)?,
            "processing.ngram_min" => updated.processing.ngram_min = parse_value(key, value)?,
            "processing.ngram_max" => updated.processing.ngram_max = parse_value(key, value)?,
            "processing.smooth_idf" => updated.processing.smooth_idf = parse_value(key, value)?,
            "processing.sublinear_tf" => updated.processing.sublinear_tf = parse_value(key, value)?,
            "processing.min_token_length" => updated.processing.min_token_length = parse_value(key, value)?,
            "scoring.similarity_weight" => updated.scoring.similarity_weight = parse_value(key, value)?,
            "scoring.keyword_weight" => updated.scoring.keyword_weight = parse_value(key, value)?,
            "scoring.top_keywords" => updated.scoring.top_keywords = parse_value(key, value)?,
            "output.format" => {
                updated.output.format = crate::cli::parse_output_format(value)
                    .map_err(ScreenerError::Configuration)?
            }
            "output.detailed" => updated.output.detailed = parse_value(key, value)?,
            "output.color_output" => updated.output.color_output = parse_value(key, value)?,
            _ => {
                return Err(ScreenerError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        ScreenerError::Configuration(format!("Invalid value for {}: {}", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.top_keywords, 20);
        assert_eq!(config.processing.ngram_max, 2);
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("scoring.top_keywords", "10").unwrap();
        config.set_value("output.format", "csv").unwrap();
        config.set_value("processing.sublinear_tf", "true").unwrap();

        assert_eq!(config.scoring.top_keywords, 10);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.processing.sublinear_tf);
    }

    #[test]
    fn test_set_value_rejects_unbalanced_weights() {
        let mut config = Config::default();
        let result = config.set_value("scoring.keyword_weight", "0.9");

        assert!(result.is_err());
        assert_eq!(config.scoring.keyword_weight, 0.4);
    }

    #[test]
    fn test_set_value_rejects_unknown_key() {
        let mut config = Config::default();
        assert!(config.set_value("models.default", "x").is_err());
        assert!(config.set_value("scoring.top_keywords", "many").is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[scoring]\ntop_keywords = 5\n").unwrap();

        assert_eq!(config.scoring.top_keywords, 5);
        assert_eq!(config.scoring.similarity_weight, 0.6);
        assert!(config.extraction.legacy_doc_fallback);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.output.format, OutputFormat::Console);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.scoring.top_keywords, config.scoring.top_keywords);
    }
}
