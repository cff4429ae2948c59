//! Text processing and matching module

pub mod document;
pub mod lemmatizer;
pub mod text_processor;
pub mod vectorizer;
pub mod matcher;
pub mod screener;
