//! Canonical verse counts per chapter, used to size and validate conversion output

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;

/// Embedded verse-count table, book code -> verse count of each chapter
pub static VERSE_COUNTS_JSON: &str = include_str!("../assets/verse_counts.json");

lazy_static! {
    static ref STANDARD_TABLE: CanonicalVerseTable = CanonicalVerseTable::from_json(VERSE_COUNTS_JSON)
        .expect("Embedded verse_counts.json is invalid");
}

/// Immutable mapping of book code to the ordered verse counts of its chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalVerseTable {
    books: HashMap<String, Vec<u16>>,
}

impl CanonicalVerseTable {
    /// The table shipped with the crate, loaded once per process.
    pub fn standard() -> &'static CanonicalVerseTable {
        &STANDARD_TABLE
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<u16>> = serde_json::from_str(json)
            .context("Failed to parse verse count table")?;

        let books = raw
            .into_iter()
            .map(|(code, counts)| (code.to_uppercase(), counts))
            .collect();

        Ok(CanonicalVerseTable { books })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read verse count table: {:?}", path))?;
        Self::from_json(&content)
    }

    /// Verse counts of every chapter in the book, chapter 1 at index 0.
    pub fn book(&self, code: &str) -> Option<&[u16]> {
        self.books.get(&code.to_uppercase()).map(|v| v.as_slice())
    }
}
