//! Passage extraction from consolidated book HTML
//!
//! Works on the markers written by [`crate::formats::html`]. The string is
//! scanned once into a [`MarkerIndex`] and every lookup is a slice of the
//! original string, with a paragraph open or close added where a passage
//! starts or ends in the middle of a paragraph.

use crate::formats::html::PARAGRAPH_CLOSE;
use crate::references::{heading_id, verse_id, PassageRange, VerseId, VERSE_ID_INCREMENT};
use crate::types::SeparatedItem;

const CHAPTER_MARKER_PREFIX: &str = "<h3 data-c=\"";
const VERSE_MARKER_PREFIX: &str = "<sup data-v=\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseMarker {
    pub chapter: u16,
    pub verse: u16,
    /// Byte range of the `<sup data-v>` element
    pub start: usize,
    pub end: usize,
    /// Start of the headings and paragraph opens directly before the marker,
    /// which belong to this verse. Equal to `start` when there are none.
    pub owned_from: usize,
    /// Opening tag of the running paragraph, when the verse starts inside it
    pub mid_paragraph: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Chapter { chapter: u16, start: usize, end: usize },
    Verse(VerseMarker),
    Heading { start: usize, end: usize },
}

/// Adjacent headings and paragraph opens, only separated by whitespace.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
    ends_with_paragraph: bool,
}

/// Markers of one HTML string, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerIndex {
    markers: Vec<Marker>,
}

impl MarkerIndex {
    pub fn build(html: &str) -> Self {
        let mut markers = Vec::new();
        let mut run: Option<Run> = None;
        let mut open_paragraph: Option<&str> = None;
        let mut pos = 0;

        while let Some(offset) = html[pos..].find('<') {
            let start = pos + offset;
            let rest = &html[start..];

            if rest.starts_with(CHAPTER_MARKER_PREFIX) {
                let end = element_end(html, start, "</h3>");
                match attribute_value(rest, CHAPTER_MARKER_PREFIX).and_then(|v| v.parse::<u16>().ok()) {
                    Some(chapter) => markers.push(Marker::Chapter { chapter, start, end }),
                    None => tracing::debug!("Skipping malformed chapter marker at {}", start),
                }
                run = None;
                open_paragraph = None;
                pos = end;
            } else if rest.starts_with(VERSE_MARKER_PREFIX) {
                let end = element_end(html, start, "</sup>");
                match attribute_value(rest, VERSE_MARKER_PREFIX).and_then(parse_chapter_verse) {
                    Some((chapter, verse)) => {
                        let adjacent = run.filter(|r| html[r.end..start].trim().is_empty());
                        let starts_paragraph = adjacent.is_some_and(|r| r.ends_with_paragraph);
                        markers.push(Marker::Verse(VerseMarker {
                            chapter,
                            verse,
                            start,
                            end,
                            owned_from: adjacent.map_or(start, |r| r.start),
                            mid_paragraph: if starts_paragraph {
                                None
                            } else {
                                open_paragraph.map(|tag| tag.to_string())
                            },
                        }));
                    }
                    None => tracing::debug!("Skipping malformed verse marker at {}", start),
                }
                run = None;
                pos = end;
            } else if rest.starts_with("<h4") {
                let end = element_end(html, start, "</h4>");
                markers.push(Marker::Heading { start, end });
                extend_run(&mut run, html, start, end, false);
                pos = end;
            } else if is_paragraph_open(rest) {
                let end = html[start..].find('>').map_or(html.len(), |i| start + i + 1);
                open_paragraph = Some(&html[start..end]);
                extend_run(&mut run, html, start, end, true);
                pos = end;
            } else if rest.starts_with(PARAGRAPH_CLOSE) {
                let end = start + PARAGRAPH_CLOSE.len();
                // An empty paragraph (a stanza break) waits for the next verse
                if let Some(r) = run.as_mut().filter(|r| r.ends_with_paragraph && html[r.end..start].trim().is_empty()) {
                    r.end = end;
                    r.ends_with_paragraph = false;
                }
                open_paragraph = None;
                pos = end;
            } else {
                pos = start + 1;
            }
        }

        MarkerIndex { markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn verses(&self) -> impl Iterator<Item = &VerseMarker> {
        self.markers.iter().filter_map(|m| match m {
            Marker::Verse(v) => Some(v),
            _ => None,
        })
    }

    /// Byte offset of the chapter marker.
    pub fn chapter_start(&self, chapter: u16) -> Option<usize> {
        self.markers.iter().find_map(|m| match m {
            Marker::Chapter { chapter: c, start, .. } if *c == chapter => Some(*start),
            _ => None,
        })
    }

    /// Byte offset of the first chapter marker after `chapter`.
    fn next_chapter_start(&self, chapter: u16) -> Option<usize> {
        self.markers.iter().find_map(|m| match m {
            Marker::Chapter { chapter: c, start, .. } if *c > chapter => Some(*start),
            _ => None,
        })
    }

    pub fn verse(&self, chapter: u16, verse: u16) -> Option<&VerseMarker> {
        self.verses().find(|v| v.chapter == chapter && v.verse == verse)
    }

    fn next_verse_after(&self, marker_index: usize) -> Option<&VerseMarker> {
        self.markers.iter().skip(marker_index + 1).find_map(|m| match m {
            Marker::Verse(v) => Some(v),
            _ => None,
        })
    }
}

fn extend_run(run: &mut Option<Run>, html: &str, start: usize, end: usize, is_paragraph: bool) {
    match run {
        Some(r) if html[r.end..start].trim().is_empty() => {
            r.end = end;
            r.ends_with_paragraph = is_paragraph;
        }
        _ => {
            *run = Some(Run {
                start,
                end,
                ends_with_paragraph: is_paragraph,
            });
        }
    }
}

fn element_end(html: &str, start: usize, close_tag: &str) -> usize {
    html[start..]
        .find(close_tag)
        .map_or(html.len(), |i| start + i + close_tag.len())
}

fn attribute_value<'h>(tag: &'h str, prefix: &str) -> Option<&'h str> {
    let value = &tag[prefix.len()..];
    value.find('"').map(|end| &value[..end])
}

fn parse_chapter_verse(value: &str) -> Option<(u16, u16)> {
    let (chapter, verse) = value.split_once(':')?;
    Some((chapter.trim().parse().ok()?, verse.trim().parse().ok()?))
}

/// Passage lookups over the consolidated HTML of one book.
///
/// Lookups that fall outside the book return an empty string or list.
pub struct PassageExtractor<'a> {
    html: &'a str,
    index: MarkerIndex,
}

impl<'a> PassageExtractor<'a> {
    pub fn new(html: &'a str) -> Self {
        PassageExtractor {
            html,
            index: MarkerIndex::build(html),
        }
    }

    pub fn index(&self) -> &MarkerIndex {
        &self.index
    }

    pub fn get_whole(&self, attribution: Option<&str>) -> String {
        let mut html = self.html.to_string();
        if let Some(attribution) = attribution {
            html.push_str(attribution);
        }
        html
    }

    pub fn get_whole_list(&self, attribution: Option<&str>) -> Vec<SeparatedItem> {
        separate_with_index(self.html, &self.index, attribution)
    }

    pub fn get_passage(&self, range: &PassageRange, attribution: Option<&str>) -> String {
        let Some((start, prefix)) = self.passage_start(range) else {
            return String::new();
        };
        let (end, suffix) = self.passage_end(range);
        if end <= start {
            return String::new();
        }

        let mut html = String::new();
        if let Some(prefix) = prefix {
            html.push_str(prefix);
        }
        html.push_str(&self.html[start..end]);
        if let Some(suffix) = suffix {
            html.push_str(suffix);
        }
        if let Some(attribution) = attribution {
            html.push_str(attribution);
        }
        html
    }

    pub fn get_passage_list(&self, range: &PassageRange, attribution: Option<&str>) -> Vec<SeparatedItem> {
        let html = self.get_passage(range, None);
        if html.is_empty() {
            return Vec::new();
        }
        separate_verses(&html, attribution)
    }

    pub fn get_chapters(&self, first: u16, last: u16, attribution: Option<&str>) -> String {
        self.get_passage(&PassageRange::chapters(first, last), attribution)
    }

    pub fn get_chapters_list(&self, first: u16, last: u16, attribution: Option<&str>) -> Vec<SeparatedItem> {
        self.get_passage_list(&PassageRange::chapters(first, last), attribution)
    }

    pub fn get_chapter(&self, chapter: u16, attribution: Option<&str>) -> String {
        self.get_passage(&PassageRange::chapter(chapter), attribution)
    }

    pub fn get_chapter_list(&self, chapter: u16, attribution: Option<&str>) -> Vec<SeparatedItem> {
        self.get_passage_list(&PassageRange::chapter(chapter), attribution)
    }

    pub fn get_verse(&self, chapter: u16, verse: u16, attribution: Option<&str>) -> String {
        self.get_passage(&PassageRange::verse(chapter, verse), attribution)
    }

    pub fn get_verse_list(&self, chapter: u16, verse: u16, attribution: Option<&str>) -> Vec<SeparatedItem> {
        self.get_passage_list(&PassageRange::verse(chapter, verse), attribution)
    }

    fn passage_start(&self, range: &PassageRange) -> Option<(usize, Option<&str>)> {
        if range.start_verse <= 1 {
            return self.index.chapter_start(range.start_chapter).map(|start| (start, None));
        }
        let marker = self.index.verse(range.start_chapter, range.start_verse)?;
        Some((marker.owned_from, marker.mid_paragraph.as_deref()))
    }

    fn passage_end(&self, range: &PassageRange) -> (usize, Option<&'static str>) {
        if range.end_verse == 0 {
            let end = self.index.chapter_start(range.end_chapter).unwrap_or(self.html.len());
            return (end, None);
        }

        let next_verse = self
            .index
            .verses()
            .find(|v| v.chapter == range.end_chapter && v.verse > range.end_verse);

        match next_verse {
            Some(marker) => {
                let suffix = marker.mid_paragraph.as_ref().map(|_| PARAGRAPH_CLOSE);
                (marker.owned_from, suffix)
            }
            None => {
                let end = self
                    .index
                    .next_chapter_start(range.end_chapter)
                    .unwrap_or(self.html.len());
                (end, None)
            }
        }
    }
}

struct OpenVerse {
    chapter: u16,
    verse: u16,
    start: usize,
    prefix: Option<String>,
}

impl OpenVerse {
    fn close(self, html: &str, end: usize) -> SeparatedItem {
        let mut body = self.prefix.unwrap_or_default();
        body.push_str(&html[self.start..end.max(self.start)]);
        balance_paragraphs(&mut body);

        SeparatedItem::Verse {
            id: verse_id(self.chapter, self.verse),
            chapter: self.chapter,
            verse: self.verse,
            html: body,
        }
    }
}

fn is_paragraph_open(tag: &str) -> bool {
    tag.starts_with("<p ") || tag.starts_with("<p>")
}

fn contains_paragraph_open(html: &str) -> bool {
    html.contains("<p ") || html.contains("<p>")
}

fn balance_paragraphs(body: &mut String) {
    let opens = body.matches("<p ").count() + body.matches("<p>").count();
    let closes = body.matches(PARAGRAPH_CLOSE).count();
    for _ in closes..opens {
        body.push_str(PARAGRAPH_CLOSE);
    }
}

/// True when the slice holds more than whitespace and paragraph tags.
fn has_body_content(html: &str) -> bool {
    let mut rest = html.trim_start();
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(PARAGRAPH_CLOSE) {
            rest = after.trim_start();
        } else if is_paragraph_open(rest) {
            match rest.find('>') {
                Some(i) => rest = rest[i + 1..].trim_start(),
                None => return true,
            }
        } else {
            return true;
        }
    }
    false
}

/// Text after a heading that still belongs to the verse before the heading.
/// Appends `html[from..to]` to the last verse item when it has content.
fn attach_continuation(items: &mut [SeparatedItem], html: &str, from: usize, to: usize) -> bool {
    if to <= from || !has_body_content(&html[from..to]) {
        return false;
    }
    let last_verse = items.iter_mut().rev().find_map(|item| match item {
        SeparatedItem::Verse { html: body, .. } => Some(body),
        SeparatedItem::Heading { .. } => None,
    });
    match last_verse {
        Some(body) => {
            body.push_str(&html[from..to]);
            balance_paragraphs(body);
            true
        }
        None => false,
    }
}

/// Split consolidated HTML into verse and heading items.
///
/// A verse item runs from the content it owns (paragraph opens before its
/// marker, or anything after the preceding heading or chapter marker) up to
/// the next heading, chapter marker or content owned by the next verse. Each
/// item is a balanced fragment. The attribution is appended to the last
/// verse item.
pub fn separate_verses(html: &str, attribution: Option<&str>) -> Vec<SeparatedItem> {
    separate_with_index(html, &MarkerIndex::build(html), attribution)
}

fn separate_with_index(html: &str, index: &MarkerIndex, attribution: Option<&str>) -> Vec<SeparatedItem> {
    let mut items = Vec::new();
    let mut open: Option<OpenVerse> = None;
    let mut cursor = 0;
    let mut last_verse_id: Option<VerseId> = None;
    let mut headings_since_verse = 0;

    for (i, marker) in index.markers().iter().enumerate() {
        match marker {
            Marker::Chapter { start, end, .. } => {
                match open.take() {
                    Some(verse) => items.push(verse.close(html, *start)),
                    None if last_verse_id.is_some() => {
                        attach_continuation(&mut items, html, cursor, *start);
                    }
                    None => {}
                }
                cursor = *end;
                last_verse_id = None;
                headings_since_verse = 0;
            }
            Marker::Heading { start, end } => {
                match open.take() {
                    Some(verse) => items.push(verse.close(html, *start)),
                    None if last_verse_id.is_some() => {
                        attach_continuation(&mut items, html, cursor, *start);
                    }
                    None => {}
                }
                headings_since_verse += 1;

                let id = match last_verse_id {
                    Some(id) => Some(heading_id(id, headings_since_verse)),
                    None => index.next_verse_after(i).map(|next| {
                        let before = verse_id(next.chapter, next.verse).saturating_sub(VERSE_ID_INCREMENT);
                        heading_id(before, headings_since_verse)
                    }),
                };
                match id {
                    Some(id) => items.push(SeparatedItem::Heading {
                        id,
                        html: html[*start..*end].to_string(),
                    }),
                    None => tracing::debug!("Skipping heading at {} with no verse to follow", start),
                }
                cursor = *end;
            }
            Marker::Verse(marker) => {
                let start = match open.take() {
                    Some(previous) => {
                        let cut = marker.owned_from.max(previous.start);
                        items.push(previous.close(html, cut));
                        cut
                    }
                    None => {
                        let owned = marker.owned_from.max(cursor);
                        if last_verse_id.is_some() && attach_continuation(&mut items, html, cursor, owned) {
                            owned
                        } else {
                            cursor
                        }
                    }
                };
                // The slice may already hold the running paragraph's open tag
                let prefix = marker
                    .mid_paragraph
                    .clone()
                    .filter(|_| !contains_paragraph_open(&html[start..marker.start]));
                open = Some(OpenVerse {
                    chapter: marker.chapter,
                    verse: marker.verse,
                    start,
                    prefix,
                });
                last_verse_id = Some(verse_id(marker.chapter, marker.verse));
                headings_since_verse = 0;
            }
        }
    }

    match open.take() {
        Some(verse) => items.push(verse.close(html, html.len())),
        None if last_verse_id.is_some() => {
            attach_continuation(&mut items, html, cursor, html.len());
        }
        None => {}
    }

    if let Some(attribution) = attribution {
        let last_verse = items.iter_mut().rev().find_map(|item| match item {
            SeparatedItem::Verse { html, .. } => Some(html),
            SeparatedItem::Heading { .. } => None,
        });
        if let Some(html) = last_verse {
            html.push_str(attribution);
        }
    }

    items
}
