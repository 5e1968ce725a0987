//! Consolidated per-book HTML
//!
//! Markers understood by the passage extractor:
//! - chapter: `<h3 data-c="C">C</h3>`
//! - verse: `<sup data-v="C:V">V</sup>`
//! - heading: `<h4 class="fb-sN">…</h4>`
//! - paragraph: `<p class="fb-{style}">`

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::formats::{CharSpan, Emitter};

pub const PARAGRAPH_CLOSE: &str = "</p>";

pub fn paragraph_open_tag(style: &str) -> String {
    format!("<p class=\"fb-{}\">", encode_double_quoted_attribute(style))
}

pub fn chapter_marker_html(chapter: u16) -> String {
    format!("<h3 data-c=\"{0}\">{0}</h3>", chapter)
}

pub fn verse_marker_html(chapter: u16, verse: u16, label: &str) -> String {
    format!("<sup data-v=\"{}:{}\">{}</sup>", chapter, verse, encode_text(label))
}

pub fn heading_html(level: u8, text: &str) -> String {
    format!("<h4 class=\"fb-s{}\">{}</h4>", level, encode_text(text))
}

pub fn note_html(contents: &str) -> String {
    format!("<span class=\"fb-note\">{}</span>", encode_text(contents))
}

pub fn char_open_tag(span: &CharSpan) -> String {
    match span {
        CharSpan::Alignment { strong: Some(strong) } => {
            format!("<span class=\"fb-w\" data-s=\"{}\">", encode_double_quoted_attribute(strong))
        }
        CharSpan::Alignment { strong: None } => "<span class=\"fb-w\">".to_string(),
        CharSpan::Superscript => "<sup class=\"fb-sup\">".to_string(),
        CharSpan::Ordinal => "<sup class=\"fb-ord\">".to_string(),
        CharSpan::Ruby { .. } => "<ruby>".to_string(),
        CharSpan::Styled(style) => {
            format!("<span class=\"fb-{}\">", encode_double_quoted_attribute(style))
        }
    }
}

pub fn char_close_tag(span: &CharSpan) -> String {
    match span {
        CharSpan::Superscript | CharSpan::Ordinal => "</sup>".to_string(),
        CharSpan::Ruby { gloss } => format!("<rt>{}</rt></ruby>", encode_text(gloss)),
        CharSpan::Alignment { .. } | CharSpan::Styled(_) => "</span>".to_string(),
    }
}

/// Writes the whole book into one string, in document order.
#[derive(Debug, Default)]
pub struct HtmlEmitter {
    html: String,
}

impl Emitter for HtmlEmitter {
    type Output = String;

    fn chapter_marker(&mut self, chapter: u16) {
        self.html.push_str(&chapter_marker_html(chapter));
    }

    fn begin_verse(&mut self, _chapter: u16, _verse: u16, _split: Option<&str>) {}

    fn verse_marker(&mut self, chapter: u16, verse: u16, label: &str) {
        self.html.push_str(&verse_marker_html(chapter, verse, label));
    }

    fn heading(&mut self, level: u8, text: &str) {
        self.html.push_str(&heading_html(level, text));
    }

    fn open_paragraph(&mut self, open_tag: &str) {
        self.html.push_str(open_tag);
    }

    fn close_paragraph(&mut self) {
        self.html.push_str(PARAGRAPH_CLOSE);
    }

    fn text(&mut self, text: &str) {
        self.html.push_str(&encode_text(text));
    }

    fn open_char(&mut self, span: &CharSpan) {
        self.html.push_str(&char_open_tag(span));
    }

    fn close_char(&mut self, span: &CharSpan) {
        self.html.push_str(&char_close_tag(span));
    }

    fn note(&mut self, contents: &str) {
        self.html.push_str(&note_html(contents));
    }

    fn finish(self) -> String {
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_markup() {
        assert_eq!(chapter_marker_html(3), r#"<h3 data-c="3">3</h3>"#);
        assert_eq!(verse_marker_html(3, 17, "17-18"), r#"<sup data-v="3:17">17-18</sup>"#);
        assert_eq!(heading_html(2, "Faith & works"), r#"<h4 class="fb-s2">Faith &amp; works</h4>"#);
        assert_eq!(paragraph_open_tag("q1"), r#"<p class="fb-q1">"#);
    }

    #[test]
    fn test_char_spans() {
        let ruby = CharSpan::Ruby { gloss: "かみ".to_string() };
        assert_eq!(format!("{}神{}", char_open_tag(&ruby), char_close_tag(&ruby)), "<ruby>神<rt>かみ</rt></ruby>");

        let w = CharSpan::Alignment { strong: Some("G2316".to_string()) };
        assert_eq!(char_open_tag(&w), r#"<span class="fb-w" data-s="G2316">"#);
        assert_eq!(char_close_tag(&w), "</span>");

        assert_eq!(char_open_tag(&CharSpan::Ordinal), r#"<sup class="fb-ord">"#);
        assert_eq!(char_open_tag(&CharSpan::Styled("wj".to_string())), r#"<span class="fb-wj">"#);
    }
}
