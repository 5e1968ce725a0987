use scripture_backend::error::ConversionError;
use scripture_backend::formats::{convert_book, usx_to_html, usx_to_txt, ConvertOptions};
use scripture_backend::types::{TxtMarker, TxtToken};
use scripture_backend::verse_table::CanonicalVerseTable;

mod helpers;
use helpers as h;

#[test]
fn test_obadiah_outputs_are_sized_from_table() {
    let book = h::convert_fixture("OBA.usx", &ConvertOptions::default());

    assert_eq!(book.book, "OBA");
    assert_eq!(book.html_verses.len(), 1);
    assert_eq!(book.html_verses[0].len(), 22);
    assert_eq!(book.txt.len(), 1);
    assert_eq!(book.txt[0].len(), 22);

    assert!(book.html_verses[0][0].is_empty());
    assert!(book.txt[0][0].is_empty());

    for verse in 1..=21 {
        let slot = &book.html_verses[0][verse];
        assert!(
            slot.1.contains(&format!(r#"<sup data-v="1:{0}">{0}</sup>"#, verse)),
            "verse {} has no marker",
            verse
        );
        assert!(!book.txt[0][verse].is_empty(), "verse {} has no text", verse);
    }
}

#[test]
fn test_obadiah_consolidated_html() {
    let html = h::fixture_html("OBA.usx");

    assert!(html.starts_with(concat!(
        r#"<h3 data-c="1">1</h3><h4 class="fb-s2">Edom Will Be Humbled</h4>"#,
        r#"<p class="fb-p"><sup data-v="1:1">1</sup>The vision of Obadiah. Thus saith the Lord <span class="fb-nd">GOD</span> concerning Edom;"#,
        r#"<span class="fb-note">Or, Idumea</span> We have heard"#,
    )));
    assert!(html.ends_with(r#"the kingdom shall be the <span class="fb-nd">LORD</span>'s.</p>"#));

    // Titles, running heads and parallel-passage references are not verse text
    assert!(!html.contains("The Book of Obadiah"));
    assert!(!html.contains("OBADIAH"));
    assert!(!html.contains("Psalm 137:7"));
    assert!(!html.contains("1:1 "));

    assert!(html.contains(r#"<h4 class="fb-s2">The Day of the LORD</h4>"#));
    assert!(!html.contains('\n'));
}

#[test]
fn test_obadiah_slots_reassemble_html() {
    let book = h::convert_fixture("OBA.usx", &ConvertOptions::default());
    let bodies: String = book.html_verses[0].iter().map(|slot| slot.1.as_str()).collect();
    assert_eq!(format!(r#"<h3 data-c="1">1</h3>{}"#, bodies), book.html);
}

#[test]
fn test_obadiah_paragraph_splits() {
    let book = h::convert_fixture("OBA.usx", &ConvertOptions::default());
    let slots = &book.html_verses[0];

    // Verse 1 spans two paragraphs
    assert_eq!(slots[1].0, "");
    assert!(slots[1].1.ends_with(r#"heathen,</p><p class="fb-q1">Arise ye, and let us rise up against her in battle.</p>"#));
    assert_eq!(slots[1].2, "");

    // Verse 3 starts inside the paragraph opened by verse 2
    assert_eq!(slots[2].2, "</p>");
    assert_eq!(slots[3].0, r#"<p class="fb-p">"#);
    assert!(slots[3].1.starts_with(r#"<sup data-v="1:3">3</sup>The pride"#));
    assert_eq!(slots[4].2, "");

    // Verse 5 opens its own paragraph
    assert_eq!(slots[5].0, "");
    assert!(slots[5].1.starts_with(r#"<p class="fb-p"><sup data-v="1:5">5</sup>"#));

    // Headings travel with the verse that follows them
    assert!(slots[10].1.starts_with(
        r#"<h4 class="fb-s2">Edom's Violence against Jacob</h4><p class="fb-p"><sup data-v="1:10">10</sup>"#
    ));
    assert!(slots[9].1.ends_with("slaughter.</p>"));

    for slot in slots.iter().skip(1) {
        let standalone = slot.standalone();
        assert_eq!(
            standalone.matches("<p ").count(),
            standalone.matches("</p>").count(),
            "unbalanced: {}",
            standalone
        );
    }
}

#[test]
fn test_obadiah_alignment_option() {
    let plain = h::convert_fixture("OBA.usx", &ConvertOptions { alignment: false });
    assert!(plain.html.contains("I have made thee small among"));
    assert!(!plain.html.contains("fb-w"));

    let aligned = h::convert_fixture("OBA.usx", &ConvertOptions { alignment: true });
    assert!(aligned.html.contains(r#"I have made thee <span class="fb-w" data-s="H6996">small</span> among"#));
    // Plain text is unaffected
    assert_eq!(plain.txt, aligned.txt);
}

#[test]
fn test_obadiah_txt() {
    let txt = usx_to_txt(
        &h::read_fixture("OBA.usx"),
        CanonicalVerseTable::standard(),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(
        txt[0][1],
        vec![
            TxtToken::Marker(TxtMarker::Heading { level: 2, contents: "Edom Will Be Humbled".to_string() }),
            TxtToken::Text("The vision of Obadiah. Thus saith the Lord GOD concerning Edom;".to_string()),
            TxtToken::Marker(TxtMarker::Note { contents: "Or, Idumea".to_string() }),
            TxtToken::Text(
                " We have heard a rumour from the LORD, and an ambassador is sent among the heathen,\nArise ye, and let us rise up against her in battle."
                    .to_string()
            ),
        ]
    );

    assert_eq!(
        txt[0][2],
        vec![TxtToken::Text("Behold, I have made thee small among the heathen: thou art greatly despised. ".to_string())]
    );

    let json = serde_json::to_string(&txt[0][15]).unwrap();
    assert!(json.starts_with(r#"[{"type":"heading","level":2,"contents":"The Day of the LORD"},"For the day"#));
}

#[test]
fn test_verse_range_fixture() {
    let book = h::convert_fixture("OBA_alt.usx", &ConvertOptions::default());
    let slots = &book.html_verses[0];

    assert!(slots[14].is_empty());
    assert!(slots[18].is_empty());
    assert!(slots[17].1.contains(r#"<sup data-v="1:17">17-18</sup>Alternate verses seventeen and eighteen."#));
    assert!(slots[17].1.starts_with(r#"<h4 class="fb-s2">Restoration</h4>"#));
}

#[test]
fn test_corrupt_numbering_aborts_book() {
    let content = h::read_fixture("OBA.usx").replace(r#"number="7" style="v""#, r#"number="3" style="v""#);
    let result = convert_book(&content, CanonicalVerseTable::standard(), &ConvertOptions::default());

    match result {
        Err(err @ ConversionError::VerseSequence { .. }) => {
            assert!(err.is_sequence_error());
            assert_eq!(err.to_string(), "OBA 1: verse 3 does not follow verse 6");
        }
        other => panic!("expected a sequence error, got {:?}", other),
    }
}

#[test]
fn test_chapter_beyond_table() {
    let content = h::read_fixture("OBA.usx").replace(
        r#"<chapter eid="OBA 1"/>"#,
        r#"<chapter eid="OBA 1"/><chapter number="2" style="c" sid="OBA 2"/>"#,
    );
    let result = usx_to_html(&content, CanonicalVerseTable::standard(), &ConvertOptions::default());
    assert_eq!(
        result,
        Err(ConversionError::ChapterOutOfRange { book: "OBA".to_string(), chapter: 2, count: 1 })
    );
}

#[test]
fn test_custom_verse_table() {
    let table = CanonicalVerseTable::from_json(r#"{"OBA": [25]}"#).unwrap();
    let book = convert_book(&h::read_fixture("OBA.usx"), &table, &ConvertOptions::default()).unwrap();
    assert_eq!(book.html_verses[0].len(), 26);
    assert!(book.html_verses[0][22..].iter().all(|slot| slot.is_empty()));

    let short = CanonicalVerseTable::from_json(r#"{"OBA": [20]}"#).unwrap();
    let book = convert_book(&h::read_fixture("OBA.usx"), &short, &ConvertOptions::default()).unwrap();
    // Extra verses extend the chapter rather than being lost
    assert_eq!(book.html_verses[0].len(), 22);
    assert!(book.html_verses[0][21].1.contains("And saviours shall come up"));
}
