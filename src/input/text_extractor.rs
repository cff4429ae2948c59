//! Text extraction from various file formats

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use lopdf::Document;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";

/// Shortest printable run kept by the legacy `.doc` fallback
const MIN_RUN_CHARS: usize = 4;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Self::extract_from_mem(&bytes)
    }
}

impl PdfExtractor {
    /// Page texts in document order, each followed by a newline
    pub fn extract_from_mem(bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes).map_err(|e| {
            ScreenerError::ExtractionFailure(format!("Error extracting text from PDF: {}", e))
        })?;

        if doc.is_encrypted() {
            return Err(ScreenerError::ExtractionFailure(
                "Error extracting text from PDF: document is encrypted".to_string(),
            ));
        }

        match Self::extract_pages(&doc) {
            Ok(text) => Ok(text),
            Err(page_error) => {
                warn!("Page-wise PDF extraction failed ({}), retrying whole document", page_error);
                pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                    ScreenerError::ExtractionFailure(format!(
                        "Error extracting text from PDF: {}; fallback extractor: {}",
                        page_error, e
                    ))
                })
            }
        }
    }

    fn extract_pages(doc: &Document) -> Result<String> {
        let mut text = String::new();

        for (page_number, _page_id) in doc.get_pages() {
            let page_text = doc.extract_text(&[page_number]).map_err(|e| {
                ScreenerError::ExtractionFailure(format!("page {}: {}", page_number, e))
            })?;
            text.push_str(&page_text);
            text.push('\n');
        }

        debug!("Extracted {} characters from PDF pages", text.len());
        Ok(text)
    }
}

pub struct WordExtractor {
    legacy_fallback: bool,
}

impl TextExtractor for WordExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let legacy = FileType::is_ole_container(&bytes)
            || path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FileType::from_extension(ext) == FileType::Doc)
                .unwrap_or(false);

        self.extract_from_mem(&bytes, legacy)
    }
}

impl WordExtractor {
    pub fn new(legacy_fallback: bool) -> Self {
        Self { legacy_fallback }
    }

    pub fn extract_from_mem(&self, bytes: &[u8], legacy: bool) -> Result<String> {
        match Self::extract_docx(bytes) {
            Ok(text) => Ok(text),
            Err(err) if legacy && self.legacy_fallback => {
                warn!("Structured Word reader failed ({}), recovering raw text runs", err);
                recover_text_runs(bytes).ok_or_else(|| {
                    ScreenerError::ExtractionFailure(format!(
                        "Error extracting text from Word document: {}; no readable text found in legacy container",
                        err
                    ))
                })
            }
            Err(err) => Err(ScreenerError::ExtractionFailure(format!(
                "Error extracting text from Word document: {}. Please ensure the file is not corrupted and is a valid Word document.",
                err
            ))),
        }
    }

    /// Paragraphs of `word/document.xml`, one per line
    fn extract_docx(bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_XML)?
            .read_to_string(&mut xml)
            .map_err(|e| ScreenerError::ExtractionFailure(format!("Unreadable {}: {}", DOCUMENT_XML, e)))?;

        paragraphs_from_xml(&xml)
    }
}

fn paragraphs_from_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if let Some(current) = open.last_mut() {
                    match e.local_name().as_ref() {
                        b"tab" => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        _ => {}
                    }
                } else if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(t) if in_text => {
                if let Some(current) = open.last_mut() {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Recover printable text from a binary container, trying both UTF-16LE and
/// 8-bit encodings and keeping whichever yields more letters.
pub fn recover_text_runs(bytes: &[u8]) -> Option<String> {
    let wide = collect_runs(
        bytes
            .chunks_exact(2)
            .map(|pair| char::from_u32(u16::from_le_bytes([pair[0], pair[1]]) as u32)),
    );
    let narrow = collect_runs(bytes.iter().map(|&b| Some(b as char)));

    let letters = |s: &str| s.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let best = if letters(&wide) >= letters(&narrow) { wide } else { narrow };

    if letters(&best) == 0 {
        None
    } else {
        Some(best)
    }
}

fn collect_runs(chars: impl Iterator<Item = Option<char>>) -> String {
    let mut runs = Vec::new();
    let mut run = String::new();

    for c in chars {
        match c {
            Some(c) if c == ' ' || c == '\t' || c.is_ascii_graphic() => run.push(c),
            Some('\r') | Some('\n') => run.push('\n'),
            _ => flush_run(&mut run, &mut runs),
        }
    }
    flush_run(&mut run, &mut runs);

    runs.join("\n")
}

fn flush_run(run: &mut String, runs: &mut Vec<String>) {
    let trimmed = run.trim();
    if trimmed.chars().count() >= MIN_RUN_CHARS && trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        runs.push(trimmed.to_string());
    }
    run.clear();
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Self::html_to_text(&html_output)
    }

    fn html_to_text(html: &str) -> String {
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let clean_text = HTML_TAG.replace_all(&text, "").replace("&amp;", "&");

        let lines: Vec<String> = clean_text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        lines.join("\n")
    }
}
