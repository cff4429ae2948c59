//! Screening report structures

use crate::processing::document::ParsedDocument;
use crate::processing::matcher::MatchScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of one resume against the job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub file_name: String,

    /// Overall score (0-100)
    pub score: f64,
    pub similarity_score: f64,
    pub keyword_coverage: f64,

    /// Job keywords found in the resume, in keyword rank order
    pub matched_keywords: Vec<String>,
    pub total_keywords: usize,

    /// Display size of the source file, e.g. `12.3 KB`
    pub file_size: String,

    /// Set when matching failed; the scores are then zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    Extraction,
    Matching,
}

/// A resume that could not be fully processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file_name: String,
    pub stage: FailureStage,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: DateTime<Utc>,

    /// Ranked keywords of the job description
    pub job_keywords: Vec<String>,

    /// Ranked by score, highest first
    pub results: Vec<MatchResult>,
    pub failures: Vec<FileFailure>,
    pub processing_time_ms: u64,
}

impl MatchResult {
    pub fn from_match(document: &ParsedDocument, score: MatchScore) -> Self {
        Self {
            file_name: document.file_name.clone(),
            score: score.score,
            similarity_score: score.similarity_score,
            keyword_coverage: score.keyword_coverage,
            matched_keywords: score.matched_keywords,
            total_keywords: score.total_keywords,
            file_size: document.display_size(),
            error: None,
        }
    }

    /// Zeroed record for a resume whose matching failed
    pub fn failed(document: &ParsedDocument, error: String) -> Self {
        let mut result = Self::from_match(document, MatchScore::zeroed());
        result.error = Some(error);
        result
    }

    pub fn keyword_summary(&self) -> String {
        format!("{}/{}", self.matched_keywords.len(), self.total_keywords)
    }
}

impl FileFailure {
    pub fn new(file_name: impl Into<String>, stage: FailureStage, error: impl fmt::Display) -> Self {
        Self {
            file_name: file_name.into(),
            stage,
            error: error.to_string(),
        }
    }
}

impl ScreeningReport {
    pub fn new(
        job_keywords: Vec<String>,
        mut results: Vec<MatchResult>,
        failures: Vec<FileFailure>,
        processing_time_ms: u64,
    ) -> Self {
        rank_results(&mut results);

        Self {
            generated_at: Utc::now(),
            job_keywords,
            results,
            failures,
            processing_time_ms,
        }
    }

    pub fn best_match(&self) -> Option<&MatchResult> {
        self.results.first()
    }

    pub fn average_score(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.score).sum::<f64>() / self.results.len() as f64
    }
}

/// Sort by score, highest first. Equal scores keep their input order.
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Extraction => write!(f, "extraction"),
            FailureStage::Matching => write!(f, "matching"),
        }
    }
}
