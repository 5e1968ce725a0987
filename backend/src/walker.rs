//! Document-order walk of one USX book
//!
//! The walker keeps the chapter/verse cursor, validates numbering, and decides
//! which verse owns each piece of content. Rendering is left to an
//! [`Emitter`], so all output formats share exactly one traversal.
//!
//! Content whose owning verse is not known yet goes to the pending queue:
//! chapter markers, headings and paragraph opens always wait for the next
//! verse, and so does any body content before the first verse of a chapter.

use std::mem;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ConversionError;
use crate::formats::html::paragraph_open_tag;
use crate::formats::{CharSpan, ConvertOptions, Emitter};
use crate::usx::{UsxDocument, UsxElement, UsxNode};
use crate::verse_table::CanonicalVerseTable;

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A queued emission, replayed once its owning verse is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    ChapterMarker(u16),
    Heading { level: u8, text: String },
    OpenParagraph(String),
    CloseParagraph,
    Text(String),
    OpenChar(CharSpan),
    CloseChar(CharSpan),
    Note(String),
}

impl Emission {
    fn replay<E: Emitter>(&self, emitter: &mut E) {
        match self {
            Emission::ChapterMarker(chapter) => emitter.chapter_marker(*chapter),
            Emission::Heading { level, text } => emitter.heading(*level, text),
            Emission::OpenParagraph(tag) => emitter.open_paragraph(tag),
            Emission::CloseParagraph => emitter.close_paragraph(),
            Emission::Text(text) => emitter.text(text),
            Emission::OpenChar(span) => emitter.open_char(span),
            Emission::CloseChar(span) => emitter.close_char(span),
            Emission::Note(contents) => emitter.note(contents),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Heading,
    Note,
}

/// Paragraph styles that carry no verse text: identification, running heads,
/// titles, labels, references and introductions.
pub fn is_ignored_para_style(style: &str) -> bool {
    let base = style.trim_end_matches(|c: char| c.is_ascii_digit());
    matches!(
        base,
        "ide" | "sts" | "rem" | "restore" | "h" | "toc" | "toca"
            | "mt" | "mte" | "cl" | "cp" | "cd" | "r" | "mr" | "sr" | "sd"
            | "imt" | "is" | "ip" | "ipi" | "im" | "imi" | "ipq" | "imq" | "ipr"
            | "iq" | "ib" | "ili" | "iot" | "io" | "iex" | "imte" | "ie"
    )
}

/// Heading severity of a paragraph style: 1 major, 2 section, 3 minor.
pub fn heading_level(style: &str) -> Option<u8> {
    match style {
        "ms" | "ms1" | "ms2" | "ms3" => Some(1),
        "s" | "s1" => Some(2),
        "s2" | "s3" | "s4" | "sp" | "qa" => Some(3),
        _ => None,
    }
}

pub struct ConversionWalker<'a, E: Emitter> {
    book: String,
    verse_counts: &'a [u16],
    options: ConvertOptions,
    emitter: E,
    current_chapter: u16,
    current_verse: u16,
    open_paragraph: Option<String>,
    paragraph_has_content: bool,
    pending: Vec<Emission>,
    /// The verse that receives output, kept across chapter markers
    last_verse: Option<(u16, u16)>,
}

/// Walk a parsed book with the given emitter.
pub fn walk_book<E: Emitter>(
    doc: &UsxDocument,
    table: &CanonicalVerseTable,
    options: &ConvertOptions,
    emitter: E,
) -> Result<E::Output, ConversionError> {
    let book = doc.book_code()?;
    let verse_counts = table
        .book(&book)
        .ok_or_else(|| ConversionError::UnknownBookCode(book.clone()))?;

    let mut walker = ConversionWalker::new(&book, verse_counts, *options, emitter);
    walker.walk(&doc.root)?;
    Ok(walker.finish())
}

impl<'a, E: Emitter> ConversionWalker<'a, E> {
    pub fn new(book: &str, verse_counts: &'a [u16], options: ConvertOptions, mut emitter: E) -> Self {
        emitter.start_book(book, verse_counts);
        ConversionWalker {
            book: book.to_string(),
            verse_counts,
            options,
            emitter,
            current_chapter: 0,
            current_verse: 0,
            open_paragraph: None,
            paragraph_has_content: false,
            pending: Vec::new(),
            last_verse: None,
        }
    }

    /// Content queued for a verse that has not started yet.
    pub fn pending(&self) -> &[Emission] {
        &self.pending
    }

    pub fn walk(&mut self, root: &UsxElement) -> Result<(), ConversionError> {
        for el in root.child_elements() {
            self.walk_book_child(el)?;
        }
        Ok(())
    }

    pub fn walk_book_child(&mut self, el: &UsxElement) -> Result<(), ConversionError> {
        match el.name.as_str() {
            "book" => {}
            "chapter" => self.chapter(el)?,
            "para" => self.paragraph(el)?,
            other => {
                tracing::debug!("{}: skipping <{}> at book level", self.book, other);
            }
        }
        Ok(())
    }

    /// Chapter and verse of the last verse started, if any.
    pub fn last_verse(&self) -> Option<(u16, u16)> {
        self.last_verse
    }

    /// Flush what is left and hand over the emitter's output.
    pub fn finish(mut self) -> E::Output {
        if !self.pending.is_empty() {
            if let Some((chapter, verse)) = self.last_verse {
                tracing::warn!(
                    "{}: {} items after the last verse attached to {}:{}",
                    self.book,
                    self.pending.len(),
                    chapter,
                    verse
                );
                self.flush_pending();
            } else {
                tracing::warn!("{}: no verses found, dropping {} queued items", self.book, self.pending.len());
                self.pending.clear();
            }
        }
        self.emitter.finish()
    }

    fn chapter(&mut self, el: &UsxElement) -> Result<(), ConversionError> {
        // <chapter eid="..."/> end markers carry no number
        let Some(number) = el.attr("number") else {
            return Ok(());
        };

        let chapter = parse_number(&self.book, "chapter", number)?;
        if self.current_chapter.checked_add(1) != Some(chapter) {
            return Err(ConversionError::ChapterSequence {
                book: self.book.clone(),
                previous: self.current_chapter,
                found: chapter,
            });
        }
        if chapter as usize > self.verse_counts.len() {
            return Err(ConversionError::ChapterOutOfRange {
                book: self.book.clone(),
                chapter,
                count: self.verse_counts.len(),
            });
        }

        self.current_chapter = chapter;
        self.current_verse = 0;
        self.pending.push(Emission::ChapterMarker(chapter));
        Ok(())
    }

    fn paragraph(&mut self, el: &UsxElement) -> Result<(), ConversionError> {
        let style = el.style();

        if is_ignored_para_style(style) {
            return Ok(());
        }

        if let Some(level) = heading_level(style) {
            let text = collapse_whitespace(&plain_text(el, TextMode::Heading));
            let text = text.trim();
            if !text.is_empty() {
                self.pending.push(Emission::Heading { level, text: text.to_string() });
            }
            return Ok(());
        }

        let open_tag = paragraph_open_tag(if style.is_empty() { "p" } else { style });
        self.open_paragraph = Some(open_tag.clone());
        self.paragraph_has_content = false;
        self.pending.push(Emission::OpenParagraph(open_tag));

        for child in &el.children {
            self.paragraph_child(child)?;
        }

        if self.pending.is_empty() && self.current_verse > 0 {
            self.emitter.close_paragraph();
        } else {
            self.pending.push(Emission::CloseParagraph);
        }
        self.open_paragraph = None;
        self.paragraph_has_content = false;
        Ok(())
    }

    fn paragraph_child(&mut self, node: &UsxNode) -> Result<(), ConversionError> {
        match node {
            UsxNode::Text(text) => self.text(text),
            UsxNode::Element(el) => match el.name.as_str() {
                "verse" => self.verse(el)?,
                "char" => self.char_span(el)?,
                "note" => self.note(el),
                "ref" => {
                    tracing::warn!(
                        "{} {}:{}: cross reference outside a note skipped",
                        self.book,
                        self.current_chapter,
                        self.current_verse
                    );
                }
                "optbreak" | "ms" | "figure" => {}
                other => {
                    tracing::debug!("{}: unwrapping unknown element <{}>", self.book, other);
                    for child in &el.children {
                        self.paragraph_child(child)?;
                    }
                }
            },
        }
        Ok(())
    }

    fn verse(&mut self, el: &UsxElement) -> Result<(), ConversionError> {
        // <verse eid="..."/> only closes the previous verse
        let Some(label) = el.attr("number") else {
            return Ok(());
        };
        let label = label.trim();

        if self.current_chapter == 0 {
            return Err(ConversionError::VerseOutsideChapter {
                book: self.book.clone(),
                verse: label.to_string(),
            });
        }

        let verse = parse_verse_number(&self.book, label)?;
        if verse <= self.current_verse {
            return Err(ConversionError::VerseSequence {
                book: self.book.clone(),
                chapter: self.current_chapter,
                previous: self.current_verse,
                found: verse,
            });
        }

        let split = if self.paragraph_has_content && self.current_verse > 0 {
            self.open_paragraph.clone()
        } else {
            None
        };

        self.emitter.begin_verse(self.current_chapter, verse, split.as_deref());
        self.flush_pending();
        self.emitter.verse_marker(self.current_chapter, verse, label);

        self.current_verse = verse;
        self.paragraph_has_content = true;
        self.last_verse = Some((self.current_chapter, verse));
        Ok(())
    }

    fn char_span(&mut self, el: &UsxElement) -> Result<(), ConversionError> {
        let span = match el.style() {
            "w" if self.options.alignment => Some(CharSpan::Alignment {
                strong: el.attr("strong").map(|s| s.to_string()),
            }),
            "w" | "" => None,
            "sup" => Some(CharSpan::Superscript),
            "ord" => Some(CharSpan::Ordinal),
            "rb" => match el.attr("gloss") {
                Some(gloss) => Some(CharSpan::Ruby { gloss: gloss.to_string() }),
                None => Some(CharSpan::Styled("rb".to_string())),
            },
            style => Some(CharSpan::Styled(style.to_string())),
        };

        if let Some(span) = &span {
            self.content(Emission::OpenChar(span.clone()));
        }
        for child in &el.children {
            self.paragraph_child(child)?;
        }
        if let Some(span) = span {
            self.content(Emission::CloseChar(span));
        }
        Ok(())
    }

    fn note(&mut self, el: &UsxElement) {
        let text = collapse_whitespace(&plain_text(el, TextMode::Note));
        let text = text.trim();
        if !text.is_empty() {
            self.content(Emission::Note(text.to_string()));
        }
    }

    fn text(&mut self, text: &str) {
        let text = collapse_whitespace(text);
        if text.trim().is_empty() && !self.paragraph_has_content {
            return;
        }
        self.content(Emission::Text(text));
    }

    /// Body content belongs to the current verse, or waits for the first
    /// verse of the chapter.
    fn content(&mut self, emission: Emission) {
        self.paragraph_has_content = true;
        if self.current_verse == 0 {
            self.pending.push(emission);
            return;
        }
        self.flush_pending();
        emission.replay(&mut self.emitter);
    }

    fn flush_pending(&mut self) {
        for emission in mem::take(&mut self.pending) {
            emission.replay(&mut self.emitter);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").into_owned()
}

/// Flattened text of a heading or note. Notes may contain cross references,
/// origin references (`fr`, `xo`) are dropped. Headings drop their notes.
fn plain_text(el: &UsxElement, mode: TextMode) -> String {
    let mut text = String::new();
    for node in &el.children {
        match node {
            UsxNode::Text(t) => text.push_str(t),
            UsxNode::Element(child) => match child.name.as_str() {
                "char" if mode == TextMode::Note && matches!(child.style(), "fr" | "xo") => {}
                "ref" if mode == TextMode::Note => text.push_str(&plain_text(child, mode)),
                "note" | "verse" | "ref" | "optbreak" | "figure" => {}
                _ => text.push_str(&plain_text(child, mode)),
            },
        }
    }
    text
}

fn parse_number(book: &str, what: &'static str, value: &str) -> Result<u16, ConversionError> {
    value.trim().parse::<u16>().map_err(|_| ConversionError::InvalidNumber {
        book: book.to_string(),
        what,
        value: value.to_string(),
    })
}

/// Leading number of a verse label: "17-18" and "17a" are verse 17.
fn parse_verse_number(book: &str, label: &str) -> Result<u16, ConversionError> {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u16>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| ConversionError::InvalidNumber {
            book: book.to_string(),
            what: "verse",
            value: label.to_string(),
        })
}
