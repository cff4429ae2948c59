//! Input manager for handling different file types

use crate::config::ExtractionConfig;
use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor, WordExtractor,
};
use crate::processing::document::ParsedDocument;
use log::{debug, info};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

pub struct InputManager {
    legacy_doc_fallback: bool,
    max_file_size: u64,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            legacy_doc_fallback: config.legacy_doc_fallback,
            max_file_size: config.max_file_size_mb.saturating_mul(1024 * 1024),
        }
    }

    /// Extract and clean the text of one resume file
    pub async fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_size = fs::metadata(path).await?.len();
        if file_size > self.max_file_size {
            return Err(ScreenerError::InvalidInput(format!(
                "File is larger than {} MB: {}",
                self.max_file_size / (1024 * 1024),
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path).await?;
        let source_format = file_type.source_format().ok_or_else(|| {
            ScreenerError::UnsupportedFormat(format!("Unsupported file type: {}", path.display()))
        })?;

        let raw_text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Docx | FileType::Doc => {
                info!("Extracting text from Word document: {}", path.display());
                WordExtractor::new(self.legacy_doc_fallback).extract(path).await?
            }
            FileType::Unknown => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "Unsupported file type: {}",
                    path.display()
                )));
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let document = ParsedDocument::new(raw_text, source_format, file_name, file_size);
        debug!(
            "Parsed {} ({}, {} words)",
            document.file_name,
            document.source_format,
            document.word_count()
        );
        Ok(document)
    }

    /// Read a job description from plain text, markdown, or any resume format
    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let text = match extension.as_str() {
            "txt" | "text" => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            "md" | "markdown" => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            _ => self.parse(path).await?.clean_text,
        };

        if text.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(format!(
                "Job description is empty: {}",
                path.display()
            )));
        }

        Ok(text)
    }

    /// Extension first, then the file signature
    async fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown);

        if by_extension != FileType::Unknown {
            return Ok(by_extension);
        }

        let mut header = Vec::with_capacity(4);
        fs::File::open(path).await?.take(4).read_to_end(&mut header).await?;

        Ok(FileType::from_signature(&header))
    }
}
