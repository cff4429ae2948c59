//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("Empty vocabulary; the documents only contain stop words or punctuation")]
    EmptyVocabulary,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No valid resumes were processed; check the file formats and try again")]
    NoValidResumes,

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl From<zip::result::ZipError> for ScreenerError {
    fn from(err: zip::result::ZipError) -> Self {
        ScreenerError::ExtractionFailure(format!("Word document container error: {}", err))
    }
}

impl From<quick_xml::Error> for ScreenerError {
    fn from(err: quick_xml::Error) -> Self {
        ScreenerError::ExtractionFailure(format!("Word document XML error: {}", err))
    }
}

impl From<csv::Error> for ScreenerError {
    fn from(err: csv::Error) -> Self {
        ScreenerError::OutputFormatting(format!("CSV error: {}", err))
    }
}
