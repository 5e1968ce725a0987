//! Error types for USX conversion and reference parsing

use thiserror::Error;

/// A conversion failure. Every variant is fatal for the book being converted,
/// the caller decides whether to continue with the next book.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Malformed USX: {0}")]
    Xml(String),

    #[error("Missing <usx> root element")]
    MissingRoot,

    #[error("Missing <book> element with a code attribute")]
    MissingBook,

    #[error("Unknown book code: {0}")]
    UnknownBookCode(String),

    #[error("{book}: chapter {found} does not follow chapter {previous}")]
    ChapterSequence { book: String, previous: u16, found: u16 },

    #[error("{book} {chapter}: verse {found} does not follow verse {previous}")]
    VerseSequence { book: String, chapter: u16, previous: u16, found: u16 },

    #[error("{book}: chapter {chapter} is beyond the {count} chapters of the verse table")]
    ChapterOutOfRange { book: String, chapter: u16, count: usize },

    #[error("{book}: verse {verse} appears before the first chapter")]
    VerseOutsideChapter { book: String, verse: String },

    #[error("{book}: invalid {what} number '{value}'")]
    InvalidNumber { book: String, what: &'static str, value: String },
}

impl ConversionError {
    /// Sequence errors point at corrupt numbering in the source text, as
    /// opposed to a document that is not a USX book at all.
    pub fn is_sequence_error(&self) -> bool {
        matches!(
            self,
            ConversionError::ChapterSequence { .. }
                | ConversionError::VerseSequence { .. }
                | ConversionError::ChapterOutOfRange { .. }
                | ConversionError::VerseOutsideChapter { .. }
                | ConversionError::InvalidNumber { .. }
        )
    }
}

impl From<quick_xml::Error> for ConversionError {
    fn from(e: quick_xml::Error) -> Self {
        ConversionError::Xml(e.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Empty reference")]
    Empty,

    #[error("Invalid passage reference: '{0}'")]
    InvalidPassage(String),

    #[error("Unknown book: '{0}'")]
    UnknownBook(String),
}
