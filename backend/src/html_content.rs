use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use tinytemplate::TinyTemplate;

static PAGE_HTML: &str = include_str!("../assets/templates/page.html");
static PASSAGE_CSS: &str = include_str!("../assets/css/passage.css");

#[derive(Serialize)]
struct TmplContext {
    lang: String,
    title: String,
    css_head: String,
    body_class: String,
    content: String,
}

impl Default for TmplContext {
    fn default() -> Self {
        TmplContext {
            lang: "en".to_string(),
            title: "".to_string(),
            css_head: PASSAGE_CSS.to_string(),
            body_class: "".to_string(),
            content: "".to_string(),
        }
    }
}

/// A standalone HTML page around an extracted passage.
///
/// `content` is inserted as is, `title` is escaped.
pub fn passage_html_page(content: &str,
                         title: &str,
                         lang: Option<&str>,
                         css_extra: Option<String>,
                         body_class: Option<String>) -> String {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("page_html", PAGE_HTML).expect("Template error in page.html!");

    let mut ctx = TmplContext {
        title: encode_text(title).to_string(),
        content: content.to_string(),
        ..Default::default()
    };

    if let Some(lang) = lang {
        ctx.lang = encode_double_quoted_attribute(lang).to_string();
    }

    if let Some(css) = css_extra {
        ctx.css_head.push_str("\n\n");
        ctx.css_head.push_str(&css);
    }

    if let Some(class) = body_class {
        ctx.body_class = encode_double_quoted_attribute(&class).to_string();
    }

    tt.render("page_html", &ctx).unwrap_or_default()
}
