//! Per-verse plain text with heading and note markers

use crate::formats::{CharSpan, Emitter};
use crate::types::{ChapterContents, TxtMarker, TxtToken, VerseContent};

#[derive(Debug, Default)]
pub struct TxtEmitter {
    book: String,
    chapters: Vec<ChapterContents>,
    current: Option<(u16, u16)>,
}

impl TxtEmitter {
    fn content(&mut self) -> Option<&mut VerseContent> {
        let (chapter, verse) = self.current?;
        let verses = self.chapters.get_mut((chapter as usize).checked_sub(1)?)?;
        let index = verse as usize;
        if index >= verses.len() {
            tracing::warn!("{} {}:{} is beyond the canonical verse count", self.book, chapter, verse);
            verses.resize(index + 1, Vec::new());
        }
        verses.get_mut(index)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(content) = self.content() {
            if let Some(TxtToken::Text(last)) = content.last_mut() {
                last.push_str(text);
            } else {
                content.push(TxtToken::Text(text.to_string()));
            }
        }
    }

    fn push_marker(&mut self, marker: TxtMarker) {
        if let Some(content) = self.content() {
            content.push(TxtToken::Marker(marker));
        }
    }
}

impl Emitter for TxtEmitter {
    type Output = Vec<ChapterContents>;

    fn start_book(&mut self, book: &str, verse_counts: &[u16]) {
        self.book = book.to_string();
        self.chapters = verse_counts
            .iter()
            .map(|&count| vec![Vec::new(); count as usize + 1])
            .collect();
    }

    fn chapter_marker(&mut self, _chapter: u16) {}

    fn begin_verse(&mut self, chapter: u16, verse: u16, _split: Option<&str>) {
        self.current = Some((chapter, verse));
    }

    fn verse_marker(&mut self, _chapter: u16, _verse: u16, _label: &str) {}

    fn heading(&mut self, level: u8, text: &str) {
        self.push_marker(TxtMarker::Heading {
            level,
            contents: text.to_string(),
        });
    }

    /// A paragraph starting inside a verse becomes a line break.
    fn open_paragraph(&mut self, _open_tag: &str) {
        let has_text = self
            .content()
            .map(|c| c.iter().any(|t| matches!(t, TxtToken::Text(_))))
            .unwrap_or(false);
        if has_text {
            self.push_text("\n");
        }
    }

    fn close_paragraph(&mut self) {}

    fn text(&mut self, text: &str) {
        self.push_text(text);
    }

    fn open_char(&mut self, _span: &CharSpan) {}

    fn close_char(&mut self, _span: &CharSpan) {}

    fn note(&mut self, contents: &str) {
        self.push_marker(TxtMarker::Note {
            contents: contents.to_string(),
        });
    }

    fn finish(self) -> Vec<ChapterContents> {
        self.chapters
    }
}
