//! Verse ids and passage references
//!
//! A verse id orders every verse and heading of a book:
//! `chapter * 10000 + verse * 10`, with headings that follow verse N taking
//! the ids N+1, N+2, ... of the gap before the next verse.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::books::{find_book, BookInfo};
use crate::error::ReferenceError;

pub type VerseId = u32;

/// Distance between the ids of two consecutive verses.
pub const VERSE_ID_INCREMENT: VerseId = 10;

const CHAPTER_ID_FACTOR: VerseId = 10_000;

pub fn verse_id(chapter: u16, verse: u16) -> VerseId {
    chapter as VerseId * CHAPTER_ID_FACTOR + verse as VerseId * VERSE_ID_INCREMENT
}

/// Id of the n-th heading (1-based) placed after the verse with id `after`.
pub fn heading_id(after: VerseId, n: u32) -> VerseId {
    after + n.min(VERSE_ID_INCREMENT - 1)
}

pub fn is_heading_id(id: VerseId) -> bool {
    id % VERSE_ID_INCREMENT != 0
}

pub fn chapter_of(id: VerseId) -> u16 {
    (id / CHAPTER_ID_FACTOR) as u16
}

pub fn verse_of(id: VerseId) -> u16 {
    ((id % CHAPTER_ID_FACTOR) / VERSE_ID_INCREMENT) as u16
}

/// A range of verses within one book.
///
/// `end_verse == 0` means "up to the start of `end_chapter`", so a whole
/// chapter `c` is `c:1` to `c+1:0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassageRange {
    pub start_chapter: u16,
    pub start_verse: u16,
    pub end_chapter: u16,
    pub end_verse: u16,
}

impl PassageRange {
    pub fn new(start_chapter: u16, start_verse: u16, end_chapter: u16, end_verse: u16) -> Self {
        PassageRange { start_chapter, start_verse, end_chapter, end_verse }
    }

    pub fn chapter(chapter: u16) -> Self {
        Self::chapters(chapter, chapter)
    }

    pub fn chapters(first: u16, last: u16) -> Self {
        PassageRange::new(first, 1, last.saturating_add(1), 0)
    }

    pub fn verse(chapter: u16, verse: u16) -> Self {
        PassageRange::new(chapter, verse, chapter, verse)
    }

    pub fn is_whole_chapters(&self) -> bool {
        self.start_verse <= 1 && self.end_verse == 0
    }
}

impl fmt::Display for PassageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PassageRange { start_chapter: sc, start_verse: sv, end_chapter: ec, end_verse: ev } = *self;

        if self.is_whole_chapters() && ec > sc {
            if ec == sc + 1 {
                write!(f, "{}", sc)
            } else {
                write!(f, "{}-{}", sc, ec - 1)
            }
        } else if sc == ec && sv == ev {
            write!(f, "{}:{}", sc, sv)
        } else if sc == ec && ev > sv {
            write!(f, "{}:{}-{}", sc, sv, ev)
        } else {
            write!(f, "{}:{}-{}:{}", sc, sv, ec, ev)
        }
    }
}

lazy_static! {
    // 3 | 3-4 | 3:16 | 3:16-18 | 3:16-4:2 | 3-4:2
    static ref RE_PASSAGE: Regex = Regex::new(
        r"^(\d+)(?:[:.](\d+))?(?:\s*[-–]\s*(\d+)(?:[:.](\d+))?)?$"
    ).unwrap();
}

impl FromStr for PassageRange {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ReferenceError::Empty);
        }

        let invalid = || ReferenceError::InvalidPassage(s.to_string());

        let caps = RE_PASSAGE.captures(s).ok_or_else(invalid)?;
        let num = |i: usize| -> Result<Option<u16>, ReferenceError> {
            match caps.get(i) {
                Some(m) => m.as_str().parse::<u16>().map(Some).map_err(|_| invalid()),
                None => Ok(None),
            }
        };

        let start_chapter = num(1)?.ok_or_else(invalid)?;
        let start_verse = num(2)?;
        let end_first = num(3)?;
        let end_second = num(4)?;

        if start_chapter == 0 {
            return Err(invalid());
        }

        let range = match (start_verse, end_first, end_second) {
            (None, None, _) => PassageRange::chapter(start_chapter),
            (None, Some(last), None) => PassageRange::chapters(start_chapter, last),
            (None, Some(ec), Some(ev)) => PassageRange::new(start_chapter, 1, ec, ev),
            (Some(sv), None, _) => PassageRange::verse(start_chapter, sv),
            (Some(sv), Some(ev), None) => PassageRange::new(start_chapter, sv, start_chapter, ev),
            (Some(sv), Some(ec), Some(ev)) => PassageRange::new(start_chapter, sv, ec, ev),
        };

        if range.end_chapter < range.start_chapter {
            return Err(invalid());
        }

        Ok(range)
    }
}

/// Parse a reference such as "JHN 3:16-18", "1 John 2" or "Jude".
///
/// Returns `None` for the range when the reference names the whole book.
pub fn parse_book_reference(reference: &str) -> Result<(&'static BookInfo, Option<PassageRange>), ReferenceError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ReferenceError::Empty);
    }

    if let Some(book) = find_book(reference) {
        return Ok((book, None));
    }

    let (book_part, passage_part) = reference
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| ReferenceError::UnknownBook(reference.to_string()))?;

    let book = find_book(book_part)
        .ok_or_else(|| ReferenceError::UnknownBook(book_part.trim().to_string()))?;
    let range = passage_part.parse::<PassageRange>()?;

    Ok((book, Some(range)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_id_scheme() {
        assert_eq!(verse_id(119, 176), 1191760);
        assert_eq!(heading_id(verse_id(119, 176), 1), 1191761);
        assert_eq!(heading_id(verse_id(119, 176), 2), 1191762);
        assert!(is_heading_id(1191761));
        assert!(!is_heading_id(1191760));
        assert_eq!(chapter_of(1191761), 119);
        assert_eq!(verse_of(1191761), 176);
        assert!(verse_id(1, 31) < verse_id(2, 1));
    }

    #[test]
    fn test_parse_passage_forms() {
        assert_eq!("3".parse::<PassageRange>().unwrap(), PassageRange::new(3, 1, 4, 0));
        assert_eq!("3-5".parse::<PassageRange>().unwrap(), PassageRange::new(3, 1, 6, 0));
        assert_eq!("3:16".parse::<PassageRange>().unwrap(), PassageRange::new(3, 16, 3, 16));
        assert_eq!("3:16-18".parse::<PassageRange>().unwrap(), PassageRange::new(3, 16, 3, 18));
        assert_eq!("3:16-4:2".parse::<PassageRange>().unwrap(), PassageRange::new(3, 16, 4, 2));
        assert_eq!("3-4:2".parse::<PassageRange>().unwrap(), PassageRange::new(3, 1, 4, 2));
        assert_eq!(" 3.16 - 18 ".parse::<PassageRange>().unwrap(), PassageRange::new(3, 16, 3, 18));
    }

    #[test]
    fn test_parse_passage_invalid() {
        assert_eq!("".parse::<PassageRange>(), Err(ReferenceError::Empty));
        assert!("abc".parse::<PassageRange>().is_err());
        assert!("0:1".parse::<PassageRange>().is_err());
        assert!("5:1-4:1".parse::<PassageRange>().is_err());
        assert!("99999".parse::<PassageRange>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for s in ["3", "3-5", "3:16", "3:16-18", "3:16-4:2", "3:16-5:0"] {
            let range: PassageRange = s.parse().unwrap();
            assert_eq!(range.to_string(), s);
        }
    }

    #[test]
    fn test_parse_book_reference() {
        let (book, range) = parse_book_reference("JHN 3:16-18").unwrap();
        assert_eq!(book.code, "JHN");
        assert_eq!(range, Some(PassageRange::new(3, 16, 3, 18)));

        let (book, range) = parse_book_reference("1 John 2").unwrap();
        assert_eq!(book.code, "1JN");
        assert_eq!(range, Some(PassageRange::chapter(2)));

        let (book, range) = parse_book_reference("Jude").unwrap();
        assert_eq!(book.code, "JUD");
        assert_eq!(range, None);

        assert!(matches!(parse_book_reference("Tobit 1:1"), Err(ReferenceError::UnknownBook(_))));
    }
}
