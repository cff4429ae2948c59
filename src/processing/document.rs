//! Parsed resume documents and text cleaning

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Pdf,
    WordDoc,
}

/// Text extracted from one resume file. Built once per file and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub raw_text: String,
    pub clean_text: String,
    pub source_format: SourceFormat,
    pub file_name: String,
    /// Size of the source file in bytes
    pub file_size: u64,
}

impl ParsedDocument {
    pub fn new(raw_text: String, source_format: SourceFormat, file_name: String, file_size: u64) -> Self {
        let clean_text = clean_text(&raw_text);

        Self {
            raw_text,
            clean_text,
            source_format,
            file_name,
            file_size,
        }
    }

    pub fn word_count(&self) -> usize {
        self.clean_text.split_whitespace().count()
    }

    /// Human readable size, e.g. `12.3 KB`
    pub fn display_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Normalize extracted text: each non-ASCII character becomes a space, whitespace
/// runs collapse to one space, and the ends are trimmed.
pub fn clean_text(text: &str) -> String {
    let ascii: String = text
        .chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect();

    WHITESPACE_RUN.replace_all(&ascii, " ").trim().to_string()
}

pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Pdf => write!(f, "PDF"),
            SourceFormat::WordDoc => write!(f, "Word document"),
        }
    }
}
