//! Output formats produced from one walk of a USX book
//!
//! The walker in [`crate::walker`] owns all chapter/verse bookkeeping and
//! validation. Each format only implements the [`Emitter`] primitives.

pub mod html;
pub mod html_verses;
pub mod txt;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::types::{BookOutputs, ChapterContents, ChapterSlots};
use crate::usx::{parse_usx, UsxDocument};
use crate::verse_table::CanonicalVerseTable;
use crate::walker::walk_book;

pub use html::HtmlEmitter;
pub use html_verses::HtmlVersesEmitter;
pub use txt::TxtEmitter;

/// Conversion options that change the produced markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Keep word-alignment spans (`<char style="w">`) instead of unwrapping them
    pub alignment: bool,
}

/// An inline character style span, as understood by every format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharSpan {
    /// Word alignment to the original language text
    Alignment { strong: Option<String> },
    Superscript,
    Ordinal,
    Ruby { gloss: String },
    Styled(String),
}

/// Emission primitives driven by the walker, in document order.
///
/// Content the walker could not yet assign to a verse (chapter markers,
/// headings, paragraph opens) is replayed right after `begin_verse` of the
/// verse that owns it.
pub trait Emitter {
    type Output;

    /// Called once before the walk with the book's canonical verse counts.
    fn start_book(&mut self, _book: &str, _verse_counts: &[u16]) {}

    fn chapter_marker(&mut self, chapter: u16);

    /// Output from now on belongs to this verse. `split` is the opening tag
    /// of the running paragraph when the verse starts in the middle of it.
    fn begin_verse(&mut self, chapter: u16, verse: u16, split: Option<&str>);

    /// The visible verse number, emitted after the verse's queued content.
    fn verse_marker(&mut self, chapter: u16, verse: u16, label: &str);

    fn heading(&mut self, level: u8, text: &str);

    fn open_paragraph(&mut self, open_tag: &str);

    fn close_paragraph(&mut self);

    fn text(&mut self, text: &str);

    fn open_char(&mut self, span: &CharSpan);

    fn close_char(&mut self, span: &CharSpan);

    fn note(&mut self, contents: &str);

    fn finish(self) -> Self::Output;
}

/// Convert a USX book to consolidated HTML.
pub fn usx_to_html(
    content: &str,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
) -> Result<String, ConversionError> {
    let doc = parse_usx(content)?;
    walk_book(&doc, table, options, HtmlEmitter::default())
}

/// Convert a USX book to per-chapter verse slots (chapter 1 at index 0).
pub fn usx_to_html_verses(
    content: &str,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
) -> Result<Vec<ChapterSlots>, ConversionError> {
    let doc = parse_usx(content)?;
    walk_book(&doc, table, options, HtmlVersesEmitter::default())
}

/// Convert a USX book to per-chapter plain-text token lists (chapter 1 at index 0).
pub fn usx_to_txt(
    content: &str,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
) -> Result<Vec<ChapterContents>, ConversionError> {
    let doc = parse_usx(content)?;
    walk_book(&doc, table, options, TxtEmitter::default())
}

/// Parse once and produce all three formats.
pub fn convert_book(
    content: &str,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
) -> Result<BookOutputs, ConversionError> {
    let doc = parse_usx(content)?;
    convert_document(&doc, table, options)
}

pub fn convert_document(
    doc: &UsxDocument,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
) -> Result<BookOutputs, ConversionError> {
    let book = doc.book_code()?;
    let html = walk_book(doc, table, options, HtmlEmitter::default())?;
    let html_verses = walk_book(doc, table, options, HtmlVersesEmitter::default())?;
    let txt = walk_book(doc, table, options, TxtEmitter::default())?;

    Ok(BookOutputs {
        book,
        html,
        html_verses,
        txt,
    })
}
