//! Batch screening: extract every resume, score it, rank the results

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::input::InputManager;
use crate::output::report::{FailureStage, FileFailure, MatchResult, ScreeningReport};
use crate::processing::document::ParsedDocument;
use crate::processing::matcher::ResumeMatcher;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct ResumeScreener {
    input_manager: InputManager,
    matcher: ResumeMatcher,
    show_progress: bool,
}

impl ResumeScreener {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            input_manager: InputManager::from_config(&config.extraction),
            matcher: ResumeMatcher::new(config)?,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Score each resume against the job description. Files that cannot be
    /// read are reported as failures and the rest of the batch continues.
    pub async fn screen(&self, resume_paths: &[PathBuf], job_description: &str) -> Result<ScreeningReport> {
        if job_description.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "Job description is empty".to_string(),
            ));
        }

        let start_time = Instant::now();
        info!("Screening {} resume(s)", resume_paths.len());

        let mut failures = Vec::new();
        let mut documents = Vec::with_capacity(resume_paths.len());

        for path in resume_paths {
            match self.input_manager.parse(path).await {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    failures.push(FileFailure::new(display_name(path), FailureStage::Extraction, e));
                }
            }
        }

        if documents.is_empty() {
            return Err(ScreenerError::NoValidResumes);
        }
        info!("Extracted {} of {} resume(s)", documents.len(), resume_paths.len());

        let job_keywords = self.matcher.job_keywords(job_description);
        let progress = self.progress_bar(documents.len() as u64)?;
        let mut results = Vec::with_capacity(documents.len());

        for document in &documents {
            progress.set_message(document.file_name.clone());
            results.push(self.score_document(document, job_description, &job_keywords, &mut failures));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let report = ScreeningReport::new(
            job_keywords,
            results,
            failures,
            start_time.elapsed().as_millis() as u64,
        );

        info!(
            "Screening completed in {}ms ({} scored, {} failed)",
            report.processing_time_ms,
            report.results.len(),
            report.failures.len()
        );

        Ok(report)
    }

    fn score_document(
        &self,
        document: &ParsedDocument,
        job_description: &str,
        job_keywords: &[String],
        failures: &mut Vec<FileFailure>,
    ) -> MatchResult {
        match self
            .matcher
            .match_with_keywords(&document.clean_text, job_description, job_keywords)
        {
            Ok(score) => MatchResult::from_match(document, score),
            Err(e) => {
                warn!("Could not score {}: {}", document.file_name, e);
                failures.push(FileFailure::new(document.file_name.clone(), FailureStage::Matching, &e));
                MatchResult::failed(document, e.to_string())
            }
        }
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Scoring [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| ScreenerError::OutputFormatting(e.to_string()))?
                .progress_chars("#>- "),
        );
        Ok(progress)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JOB: &str = "Looking for a Python developer with Django and REST API experience";

    fn legacy_doc(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut bytes = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1\x00\x00".to_vec();
        bytes.extend_from_slice(text.as_bytes());
        bytes.extend_from_slice(b"\x00\x00\x00");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn screener() -> ResumeScreener {
        ResumeScreener::new(&Config::default()).unwrap().with_progress(false)
    }

    #[tokio::test]
    async fn test_batch_is_ranked_and_failures_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "Python developer").unwrap();

        let paths = vec![
            legacy_doc(&dir, "weak.doc", "Java engineer with Spring experience"),
            notes,
            legacy_doc(&dir, "strong.doc", "Python developer experienced with Django and REST API design"),
        ];

        let report = screener().screen(&paths, JOB).await.unwrap();

        let names: Vec<&str> = report.results.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["strong.doc", "weak.doc"]);
        assert!(report.results[0].score > report.results[1].score);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "notes.txt");
        assert_eq!(report.failures[0].stage, FailureStage::Extraction);
        assert!(report.job_keywords.contains(&"python".to_string()));
    }

    #[tokio::test]
    async fn test_report_keywords_match_scored_keywords() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            legacy_doc(&dir, "a.doc", "Python developer skilled in Django and REST APIs"),
            legacy_doc(&dir, "b.doc", "Django REST framework experience"),
        ];

        let report = screener().screen(&paths, JOB).await.unwrap();

        let expected = ResumeMatcher::default().job_keywords(JOB);
        assert_eq!(report.job_keywords, expected);
        for result in &report.results {
            assert_eq!(result.total_keywords, report.job_keywords.len());
            assert!(result
                .matched_keywords
                .iter()
                .all(|keyword| report.job_keywords.contains(keyword)));
        }
    }

    #[tokio::test]
    async fn test_blank_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![legacy_doc(&dir, "cv.doc", "Python developer")];

        let result = screener().screen(&paths, " \t").await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_no_valid_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "Python developer").unwrap();

        let result = screener().screen(&[notes, dir.path().join("missing.pdf")], JOB).await;
        assert!(matches!(result, Err(ScreenerError::NoValidResumes)));
    }
}
