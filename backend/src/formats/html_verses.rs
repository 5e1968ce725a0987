//! Per-verse HTML triplets

use html_escape::encode_text;

use crate::formats::html::{
    char_close_tag, char_open_tag, heading_html, note_html, verse_marker_html, PARAGRAPH_CLOSE,
};
use crate::formats::{CharSpan, Emitter};
use crate::types::{ChapterSlots, VerseSlot};

/// Fills one [`VerseSlot`] per canonical verse. Chapter markers are not part
/// of any verse and are dropped.
#[derive(Debug, Default)]
pub struct HtmlVersesEmitter {
    book: String,
    chapters: Vec<ChapterSlots>,
    current: Option<(u16, u16)>,
}

impl HtmlVersesEmitter {
    fn slot_mut(&mut self, chapter: u16, verse: u16) -> Option<&mut VerseSlot> {
        let slots = self.chapters.get_mut((chapter as usize).checked_sub(1)?)?;
        let index = verse as usize;
        if index >= slots.len() {
            tracing::warn!(
                "{} {}:{} is beyond the canonical verse count {}",
                self.book,
                chapter,
                verse,
                slots.len().saturating_sub(1)
            );
            slots.resize(index + 1, VerseSlot::default());
        }
        slots.get_mut(index)
    }

    fn body(&mut self) -> Option<&mut String> {
        let (chapter, verse) = self.current?;
        self.slot_mut(chapter, verse).map(|slot| &mut slot.1)
    }

    fn push(&mut self, html: &str) {
        if let Some(body) = self.body() {
            body.push_str(html);
        }
    }
}

impl Emitter for HtmlVersesEmitter {
    type Output = Vec<ChapterSlots>;

    fn start_book(&mut self, book: &str, verse_counts: &[u16]) {
        self.book = book.to_string();
        self.chapters = verse_counts
            .iter()
            .map(|&count| vec![VerseSlot::default(); count as usize + 1])
            .collect();
    }

    fn chapter_marker(&mut self, _chapter: u16) {}

    fn begin_verse(&mut self, chapter: u16, verse: u16, split: Option<&str>) {
        if let Some(open_tag) = split {
            if let Some((prev_chapter, prev_verse)) = self.current {
                if let Some(prev) = self.slot_mut(prev_chapter, prev_verse) {
                    prev.2 = PARAGRAPH_CLOSE.to_string();
                }
            }
            if let Some(slot) = self.slot_mut(chapter, verse) {
                slot.0 = open_tag.to_string();
            }
        }
        self.current = Some((chapter, verse));
    }

    fn verse_marker(&mut self, chapter: u16, verse: u16, label: &str) {
        self.push(&verse_marker_html(chapter, verse, label));
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.push(&heading_html(level, text));
    }

    fn open_paragraph(&mut self, open_tag: &str) {
        self.push(open_tag);
    }

    fn close_paragraph(&mut self) {
        self.push(PARAGRAPH_CLOSE);
    }

    fn text(&mut self, text: &str) {
        self.push(&encode_text(text));
    }

    fn open_char(&mut self, span: &CharSpan) {
        self.push(&char_open_tag(span));
    }

    fn close_char(&mut self, span: &CharSpan) {
        self.push(&char_close_tag(span));
    }

    fn note(&mut self, contents: &str) {
        self.push(&note_html(contents));
    }

    fn finish(self) -> Vec<ChapterSlots> {
        self.chapters
    }
}
