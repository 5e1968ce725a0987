//! Passage lookup and synchronization on converted book HTML

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use scripture_backend::books::{book_name, BookInfo};
use scripture_backend::extractor::PassageExtractor;
use scripture_backend::html_content::passage_html_page;
use scripture_backend::references::{parse_book_reference, PassageRange};
use scripture_backend::sync::sync_verses;
use scripture_backend::types::{SeparatedItem, SyncedRow};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PassageFormat {
    /// The HTML fragment
    #[default]
    Html,
    /// Verse and heading items as JSON
    Json,
    /// A standalone HTML page
    Page,
}

/// A parsed passage argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageRequest {
    pub book: Option<&'static BookInfo>,
    /// None for the whole book
    pub range: Option<PassageRange>,
}

impl PassageRequest {
    /// Accepts "3:16-18", "JHN 3:16-18", "1 John 2" or "Jude".
    pub fn parse(reference: &str) -> Result<Self> {
        if let Ok(range) = reference.parse::<PassageRange>() {
            return Ok(PassageRequest { book: None, range: Some(range) });
        }

        let (book, range) = parse_book_reference(reference)
            .with_context(|| format!("Invalid reference: {}", reference))?;

        Ok(PassageRequest { book: Some(book), range })
    }

    pub fn title(&self, book_code: Option<&str>) -> String {
        let book = self
            .book
            .map(|b| b.name)
            .or_else(|| book_code.and_then(book_name))
            .or(book_code)
            .unwrap_or_default();

        match &self.range {
            Some(range) => format!("{} {}", book, range).trim().to_string(),
            None => book.to_string(),
        }
    }

    fn items(&self, extractor: &PassageExtractor, attribution: Option<&str>) -> Vec<SeparatedItem> {
        match &self.range {
            Some(range) => extractor.get_passage_list(range, attribution),
            None => extractor.get_whole_list(attribution),
        }
    }

    fn html(&self, extractor: &PassageExtractor, attribution: Option<&str>) -> String {
        match &self.range {
            Some(range) => extractor.get_passage(range, attribution),
            None => extractor.get_whole(attribution),
        }
    }
}

/// Book code of an asset file such as `html/JHN.html`.
pub fn book_code_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_uppercase())
}

pub fn read_book_html(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read book HTML: {}", path.display()))
}

/// Extract a passage in the requested format. A passage that is not in the
/// book is an error here, so the command can report it.
pub fn extract_passage(
    html: &str,
    request: &PassageRequest,
    format: PassageFormat,
    attribution: Option<&str>,
    title: &str,
    lang: &str,
) -> Result<String> {
    let extractor = PassageExtractor::new(html);

    match format {
        PassageFormat::Json => {
            let items = request.items(&extractor, attribution);
            serde_json::to_string_pretty(&items).context("Failed to serialize passage")
        }
        PassageFormat::Html | PassageFormat::Page => {
            let passage = request.html(&extractor, attribution);
            if passage.is_empty() {
                anyhow::bail!("Passage not found: {}", title);
            }
            if format == PassageFormat::Page {
                Ok(passage_html_page(&passage, title, Some(lang), None, None))
            } else {
                Ok(passage)
            }
        }
    }
}

/// Align the same passage across several translations of one book. The first
/// translation provides the headings.
pub fn sync_passage(htmls: &[String], request: &PassageRequest) -> Vec<SyncedRow> {
    let translations: Vec<Vec<SeparatedItem>> = htmls
        .iter()
        .map(|html| request.items(&PassageExtractor::new(html), None))
        .collect();

    sync_verses(&translations)
}
