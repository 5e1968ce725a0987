//! Output shapes shared by the converter, the passage extractor and the synchronizer

use serde::{Deserialize, Serialize};

use crate::references::VerseId;

/// One verse of the HTML-triplet format, serialized as a 3-element array.
///
/// - `0`: opening tag needed when the verse starts mid-paragraph
/// - `1`: the verse body exactly as it appears in the consolidated HTML
/// - `2`: closing tag needed when the verse ends mid-paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseSlot(pub String, pub String, pub String);

impl VerseSlot {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty() && self.1.is_empty() && self.2.is_empty()
    }

    /// The verse as standalone, balanced markup.
    pub fn standalone(&self) -> String {
        format!("{}{}{}", self.0, self.1, self.2)
    }
}

/// Verse slots of one chapter, index 0 unused, index i = verse i.
pub type ChapterSlots = Vec<VerseSlot>;

/// A marker interleaved with the plain text of the TXT format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TxtMarker {
    Heading { level: u8, contents: String },
    Note { contents: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxtToken {
    Text(String),
    Marker(TxtMarker),
}

/// Plain-text content of one verse.
pub type VerseContent = Vec<TxtToken>;

/// Verse contents of one chapter, index 0 unused, index i = verse i.
pub type ChapterContents = Vec<VerseContent>;

/// A verse or heading split out of consolidated HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeparatedItem {
    Verse {
        id: VerseId,
        chapter: u16,
        verse: u16,
        html: String,
    },
    Heading {
        id: VerseId,
        html: String,
    },
}

impl SeparatedItem {
    pub fn id(&self) -> VerseId {
        match self {
            SeparatedItem::Verse { id, .. } => *id,
            SeparatedItem::Heading { id, .. } => *id,
        }
    }

    pub fn html(&self) -> &str {
        match self {
            SeparatedItem::Verse { html, .. } => html,
            SeparatedItem::Heading { html, .. } => html,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, SeparatedItem::Heading { .. })
    }
}

/// One row of a multi-translation parallel view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncedRow {
    Heading {
        id: VerseId,
        html: String,
    },
    Verse {
        id: VerseId,
        chapter: u16,
        verse: u16,
        /// One entry per translation, empty where a translation lacks the verse
        html: Vec<String>,
    },
}

/// Everything produced from converting one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOutputs {
    pub book: String,
    pub html: String,
    /// Chapter 1 at index 0
    pub html_verses: Vec<ChapterSlots>,
    /// Chapter 1 at index 0
    pub txt: Vec<ChapterContents>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_slot_json_shape() {
        let slot = VerseSlot("<p class=\"fb-p\">".to_string(), "text".to_string(), "</p>".to_string());
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"["<p class=\"fb-p\">","text","</p>"]"#);
    }

    #[test]
    fn test_txt_token_json_shape() {
        let content: VerseContent = vec![
            TxtToken::Marker(TxtMarker::Heading { level: 2, contents: "Greeting".to_string() }),
            TxtToken::Text("Jude, a servant".to_string()),
            TxtToken::Marker(TxtMarker::Note { contents: "Or slave".to_string() }),
        ];
        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"heading","level":2,"contents":"Greeting"},"Jude, a servant",{"type":"note","contents":"Or slave"}]"#
        );
        let back: VerseContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn test_synced_row_json_shape() {
        let row = SyncedRow::Verse { id: 30400, chapter: 3, verse: 40, html: vec!["a".to_string(), String::new()] };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"type":"verse","id":30400,"chapter":3,"verse":40,"html":["a",""]}"#);
    }
}
