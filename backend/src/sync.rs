//! Verse alignment across translations for parallel display
//!
//! Every translation is a list of [`SeparatedItem`]s in id order. The first
//! list is the primary translation and the only one whose headings are kept.

use crate::references::{chapter_of, is_heading_id, verse_of};
use crate::types::{SeparatedItem, SyncedRow};

/// Merge per-translation item lists into rows, one per verse id.
///
/// A translation that lacks a verse contributes an empty string to that row,
/// so a missing verse never shifts the rows after it.
pub fn sync_verses(translations: &[Vec<SeparatedItem>]) -> Vec<SyncedRow> {
    let mut cursors = vec![0usize; translations.len()];
    let mut rows = Vec::new();

    loop {
        for (items, cursor) in translations.iter().zip(cursors.iter_mut()).skip(1) {
            while items.get(*cursor).is_some_and(|item| item.is_heading()) {
                *cursor += 1;
            }
        }

        let next_id = translations
            .iter()
            .zip(&cursors)
            .filter_map(|(items, &cursor)| items.get(cursor).map(|item| item.id()))
            .min();
        let Some(id) = next_id else {
            break;
        };

        if is_heading_id(id) {
            if let Some(item) = translations.first().and_then(|items| items.get(cursors[0])) {
                rows.push(SyncedRow::Heading {
                    id,
                    html: item.html().to_string(),
                });
            }
            cursors[0] += 1;
            continue;
        }

        let mut html = Vec::with_capacity(translations.len());
        for (items, cursor) in translations.iter().zip(cursors.iter_mut()) {
            match items.get(*cursor) {
                Some(item) if item.id() == id && !item.is_heading() => {
                    html.push(item.html().to_string());
                    *cursor += 1;
                }
                _ => html.push(String::new()),
            }
        }

        rows.push(SyncedRow::Verse {
            id,
            chapter: chapter_of(id),
            verse: verse_of(id),
            html,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::verse_id;

    fn verse(chapter: u16, verse: u16, html: &str) -> SeparatedItem {
        SeparatedItem::Verse {
            id: verse_id(chapter, verse),
            chapter,
            verse,
            html: html.to_string(),
        }
    }

    fn heading(id: u32, html: &str) -> SeparatedItem {
        SeparatedItem::Heading {
            id,
            html: html.to_string(),
        }
    }

    fn row(chapter: u16, v: u16, html: &[&str]) -> SyncedRow {
        SyncedRow::Verse {
            id: verse_id(chapter, v),
            chapter,
            verse: v,
            html: html.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_verse_keeps_alignment() {
        let a = vec![verse(3, 39, "a39"), verse(3, 40, "a40"), verse(4, 1, "a41")];
        let b = vec![verse(3, 39, "b39"), verse(4, 1, "b41")];

        let rows = sync_verses(&[a, b]);
        assert_eq!(
            rows,
            vec![
                row(3, 39, &["a39", "b39"]),
                row(3, 40, &["a40", ""]),
                row(4, 1, &["a41", "b41"]),
            ]
        );
    }

    #[test]
    fn test_only_primary_headings_are_kept() {
        let a = vec![heading(10001, "A title"), verse(1, 1, "a1"), verse(1, 2, "a2")];
        let b = vec![verse(1, 1, "b1"), heading(10011, "B title"), verse(1, 2, "b2")];

        let rows = sync_verses(&[a, b]);
        assert_eq!(
            rows,
            vec![
                SyncedRow::Heading { id: 10001, html: "A title".to_string() },
                row(1, 1, &["a1", "b1"]),
                row(1, 2, &["a2", "b2"]),
            ]
        );
    }

    #[test]
    fn test_verse_only_in_secondary() {
        let a = vec![verse(1, 1, "a1")];
        let b = vec![verse(1, 1, "b1"), verse(1, 2, "b2")];
        let rows = sync_verses(&[a, b]);
        assert_eq!(rows[1], row(1, 2, &["", "b2"]));
    }

    #[test]
    fn test_permuting_secondary_translations() {
        let a = vec![verse(119, 176, "a"), heading(119_1761, "Heading")];
        let b = vec![verse(119, 175, "b175"), verse(119, 176, "b176")];
        let c = vec![heading(119_1751, "C only"), verse(119, 176, "c176")];

        let forward = sync_verses(&[a.clone(), b.clone(), c.clone()]);
        let swapped = sync_verses(&[a, c, b]);
        assert_eq!(forward.len(), swapped.len());

        for (f, s) in forward.iter().zip(&swapped) {
            match (f, s) {
                (SyncedRow::Verse { id: fid, html: fh, .. }, SyncedRow::Verse { id: sid, html: sh, .. }) => {
                    assert_eq!(fid, sid);
                    assert_eq!(fh[0], sh[0]);
                    assert_eq!(fh[1], sh[2]);
                    assert_eq!(fh[2], sh[1]);
                }
                (f, s) => assert_eq!(f, s),
            }
        }
        assert!(forward.iter().all(|r| !matches!(r, SyncedRow::Heading { html, .. } if html == "C only")));
    }

    #[test]
    fn test_rows_ascend() {
        let a = vec![verse(1, 1, "a1"), verse(1, 3, "a3"), verse(2, 1, "a21")];
        let b = vec![verse(1, 2, "b2"), verse(1, 3, "b3")];
        let ids: Vec<u32> = sync_verses(&[a, b])
            .iter()
            .map(|r| match r {
                SyncedRow::Verse { id, .. } | SyncedRow::Heading { id, .. } => *id,
            })
            .collect();
        assert_eq!(ids, vec![10010, 10020, 10030, 20010]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sync_verses(&[]).is_empty());
        assert!(sync_verses(&[Vec::new(), Vec::new()]).is_empty());
    }
}
