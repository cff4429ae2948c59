//! Report structures and output formatting

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{FailureStage, FileFailure, MatchResult, ScreeningReport};
