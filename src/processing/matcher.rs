//! Resume to job description matching and scoring

use crate::config::{Config, ProcessingConfig, ScoringConfig};
use crate::error::{Result, ScreenerError};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vectorizer::TfidfVectorizer;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scores one resume against one job description
pub struct ResumeMatcher {
    text_processor: TextProcessor,
    vectorizer: TfidfVectorizer,
    min_token_length: usize,
    similarity_weight: f64,
    keyword_weight: f64,
    top_keywords: usize,
}

/// Match outcome, all figures on a 0-100 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: f64,
    pub similarity_score: f64,
    pub keyword_coverage: f64,
    pub matched_keywords: Vec<String>,
    pub total_keywords: usize,
}

impl MatchScore {
    pub fn zeroed() -> Self {
        Self {
            score: 0.0,
            similarity_score: 0.0,
            keyword_coverage: 0.0,
            matched_keywords: Vec::new(),
            total_keywords: 0,
        }
    }
}

impl Default for ResumeMatcher {
    fn default() -> Self {
        Self::from_parts(&ProcessingConfig::default(), &ScoringConfig::default())
    }
}

impl ResumeMatcher {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(&config.processing, &config.scoring))
    }

    fn from_parts(processing: &ProcessingConfig, scoring: &ScoringConfig) -> Self {
        Self {
            text_processor: TextProcessor::new(),
            vectorizer: TfidfVectorizer::new(processing),
            min_token_length: processing.min_token_length,
            similarity_weight: scoring.similarity_weight,
            keyword_weight: scoring.keyword_weight,
            top_keywords: scoring.top_keywords,
        }
    }

    /// Normalized, lemmatized form of `text`
    pub fn preprocess(&self, text: &str) -> String {
        self.text_processor.preprocess(text)
    }

    /// The `top_n` highest weighted terms (unigrams and bigrams) of `text`,
    /// scored against itself. Empty when nothing survives preprocessing.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        let terms = self.index_terms(text);

        match self.vectorizer.fit_transform(&[terms]) {
            Ok(matrix) => matrix
                .ranked_terms(0)
                .into_iter()
                .filter(|(_, weight)| *weight > 0.0)
                .take(top_n)
                .map(|(term, _)| term.to_string())
                .collect(),
            Err(e) => {
                warn!("Error extracting keywords: {}", e);
                Vec::new()
            }
        }
    }

    /// TF-IDF cosine similarity in [0, 1]; 0.0 when either text is empty
    /// after preprocessing
    pub fn calculate_similarity(&self, first: &str, second: &str) -> f64 {
        let documents = [self.index_terms(first), self.index_terms(second)];

        match self.vectorizer.fit_transform(&documents) {
            Ok(matrix) => matrix.cosine_similarity(0, 1),
            Err(e) => {
                warn!("Error calculating similarity: {}", e);
                0.0
            }
        }
    }

    /// Ranked keywords a job description is scored on
    pub fn job_keywords(&self, job_description: &str) -> Vec<String> {
        self.extract_keywords(job_description, self.top_keywords)
    }

    /// Combined score of a resume against a job description
    pub fn match_resume_to_job(&self, resume_text: &str, job_description: &str) -> Result<MatchScore> {
        let job_keywords = self.job_keywords(job_description);
        self.match_with_keywords(resume_text, job_description, &job_keywords)
    }

    /// Same as `match_resume_to_job`, with the job keywords already extracted.
    /// Lets a batch share one keyword list across every resume.
    pub fn match_with_keywords(
        &self,
        resume_text: &str,
        job_description: &str,
        job_keywords: &[String],
    ) -> Result<MatchScore> {
        if job_description.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "Job description is empty".to_string(),
            ));
        }

        let similarity = self.calculate_similarity(resume_text, job_description);

        let resume_terms = self.resume_terms(resume_text);
        let matched_keywords: Vec<String> = job_keywords
            .iter()
            .filter(|keyword| resume_terms.contains(keyword.as_str()))
            .cloned()
            .collect();

        let coverage = if job_keywords.is_empty() {
            0.0
        } else {
            matched_keywords.len() as f64 / job_keywords.len() as f64
        };

        let score = (self.similarity_weight * similarity + self.keyword_weight * coverage).clamp(0.0, 1.0);
        if !score.is_finite() || !similarity.is_finite() {
            return Err(ScreenerError::Processing(format!(
                "Non-finite score (similarity {}, coverage {})",
                similarity, coverage
            )));
        }

        debug!(
            "Match: similarity {:.4}, coverage {}/{}, score {:.4}",
            similarity,
            matched_keywords.len(),
            job_keywords.len(),
            score
        );

        Ok(MatchScore {
            score: score * 100.0,
            similarity_score: similarity * 100.0,
            keyword_coverage: coverage * 100.0,
            matched_keywords,
            total_keywords: job_keywords.len(),
        })
    }

    /// Tokens the vectorizer indexes: preprocessed tokens above the length floor
    fn index_terms(&self, text: &str) -> Vec<String> {
        self.text_processor
            .analyze(text)
            .into_iter()
            .filter(|token| token.chars().count() >= self.min_token_length)
            .collect()
    }

    /// Every preprocessed token of the resume plus the n-grams keywords are built from
    fn resume_terms(&self, resume_text: &str) -> HashSet<String> {
        let mut terms: HashSet<String> = self.text_processor.analyze(resume_text).into_iter().collect();
        terms.extend(self.vectorizer.ngrams(&self.index_terms(resume_text)));
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "Looking for a Python developer with Django and REST API experience";

    #[test]
    fn test_strong_match_scores_above_half() {
        let matcher = ResumeMatcher::default();
        let resume = "Python developer experienced with Django and REST API design";

        let result = matcher.match_resume_to_job(resume, JOB).unwrap();

        assert!(result.score > 50.0, "score was {}", result.score);
        assert!(result.matched_keywords.contains(&"python".to_string()));
        assert!(result.matched_keywords.contains(&"rest api".to_string()));
        assert_eq!(result.total_keywords, 11);
    }

    #[test]
    fn test_screening_scenario_with_flask_resume() {
        let matcher = ResumeMatcher::default();
        let resume = "Experienced Python developer skilled in Django, Flask, and REST APIs";

        let result = matcher.match_resume_to_job(resume, JOB).unwrap();

        assert!(result.score > 50.0, "score was {}", result.score);
        assert!(result.keyword_coverage > 0.0);
        for keyword in ["python", "django", "rest api", "api"] {
            assert!(
                result.matched_keywords.contains(&keyword.to_string()),
                "{} missing from {:?}",
                keyword,
                result.matched_keywords
            );
        }
    }

    #[test]
    fn test_shared_keywords_give_same_score() {
        let matcher = ResumeMatcher::default();
        let resume = "Experienced Python developer skilled in Django, Flask, and REST APIs";
        let keywords = matcher.job_keywords(JOB);

        let shared = matcher.match_with_keywords(resume, JOB, &keywords).unwrap();

        assert_eq!(shared, matcher.match_resume_to_job(resume, JOB).unwrap());
        assert_eq!(shared.total_keywords, keywords.len());
    }

    #[test]
    fn test_unrelated_resume_scores_zero() {
        let matcher = ResumeMatcher::default();
        let resume = "Registered nurse with pediatric care background";

        let result = matcher.match_resume_to_job(resume, JOB).unwrap();

        assert_eq!(result.score, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_empty_resume_is_well_formed() {
        let matcher = ResumeMatcher::default();

        let result = matcher.match_resume_to_job("", JOB).unwrap();

        assert_eq!(result.score, 0.0);
        assert_eq!(result.similarity_score, 0.0);
        assert_eq!(result.keyword_coverage, 0.0);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_blank_job_description_is_rejected() {
        let matcher = ResumeMatcher::default();

        let result = matcher.match_resume_to_job("Python developer", "   \n");
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[test]
    fn test_job_of_stop_words_gives_zero_coverage() {
        let matcher = ResumeMatcher::default();

        let result = matcher.match_resume_to_job("Python developer", "the and of").unwrap();

        assert_eq!(result.total_keywords, 0);
        assert_eq!(result.keyword_coverage, 0.0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let matcher = ResumeMatcher::default();
        let resumes = [
            "Python Python Python Django Django REST API API experience developer",
            "Java Spring engineer",
            "Django",
        ];

        for resume in resumes {
            let result = matcher.match_resume_to_job(resume, JOB).unwrap();
            for value in [result.score, result.similarity_score, result.keyword_coverage] {
                assert!((0.0..=100.0).contains(&value), "{} out of range", value);
            }
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let matcher = ResumeMatcher::default();
        let first = "Senior Rust engineer building async network services";
        let second = "Backend engineer with Rust, Tokio and gRPC services";

        assert_eq!(
            matcher.calculate_similarity(first, second),
            matcher.calculate_similarity(second, first)
        );
    }

    #[test]
    fn test_self_similarity() {
        let matcher = ResumeMatcher::default();

        assert!((matcher.calculate_similarity(JOB, JOB) - 1.0).abs() < 1e-9);
        assert_eq!(matcher.calculate_similarity("", JOB), 0.0);
    }

    #[test]
    fn test_extract_keywords_in_first_occurrence_order() {
        let matcher = ResumeMatcher::default();

        let keywords = matcher.extract_keywords(JOB, 5);

        assert_eq!(
            keywords,
            vec!["python", "python developer", "developer", "developer django", "django"]
        );
        assert!(matcher.extract_keywords("", 5).is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_weights() {
        let mut config = Config::default();
        config.scoring.similarity_weight = 0.9;

        assert!(ResumeMatcher::new(&config).is_err());
    }
}
