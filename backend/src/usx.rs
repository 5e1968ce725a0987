//! USX parsing into a small element tree
//!
//! The walker needs to look ahead inside paragraphs and notes, so the whole
//! book is read into memory first with the quick-xml event reader.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ConversionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsxNode {
    Element(UsxElement),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsxElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<UsxNode>,
}

impl UsxElement {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `style` attribute, empty when missing.
    pub fn style(&self) -> &str {
        self.attr("style").unwrap_or_default()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &UsxElement> {
        self.children.iter().filter_map(|node| match node {
            UsxNode::Element(el) => Some(el),
            UsxNode::Text(_) => None,
        })
    }
}

/// A parsed USX book document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsxDocument {
    pub root: UsxElement,
}

impl UsxDocument {
    /// The USX code from `<book code="...">`, upper-cased.
    pub fn book_code(&self) -> Result<String, ConversionError> {
        self.root
            .child_elements()
            .find(|el| el.name == "book")
            .and_then(|el| el.attr("code"))
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .ok_or(ConversionError::MissingBook)
    }
}

/// Parse USX content. The root element must be `<usx>`.
pub fn parse_usx(content: &str) -> Result<UsxDocument, ConversionError> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut stack: Vec<UsxElement> = Vec::new();
    let mut root: Option<UsxElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ConversionError::Xml("Unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape()?.into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(UsxNode::Text(text));
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(UsxNode::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConversionError::Xml(format!(
                    "XML parse error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(ConversionError::Xml(format!("Unclosed element <{}>", unclosed.name)));
    }

    match root {
        Some(root) if root.name == "usx" => Ok(UsxDocument { root }),
        _ => Err(ConversionError::MissingRoot),
    }
}

fn attach(stack: &mut [UsxElement], root: &mut Option<UsxElement>, element: UsxElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(UsxNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    }
}

fn element_from_start(start: &BytesStart) -> Result<UsxElement, ConversionError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| ConversionError::Xml(e.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ConversionError::Xml(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ConversionError::Xml(e.to_string()))?
            .to_string();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(UsxElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book_structure() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <usx version="3.0">
                <book code="jud" style="id">Jude</book>
                <chapter number="1" style="c" sid="JUD 1"/>
                <para style="p"><verse number="1" style="v" sid="JUD 1:1"/>Jude, a servant &amp; brother</para>
            </usx>"#;

        let doc = parse_usx(xml).unwrap();
        assert_eq!(doc.root.name, "usx");
        assert_eq!(doc.book_code().unwrap(), "JUD");

        let names: Vec<&str> = doc.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["book", "chapter", "para"]);

        let para = doc.root.child_elements().nth(2).unwrap();
        assert_eq!(para.style(), "p");
        let text: String = para
            .children
            .iter()
            .filter_map(|node| match node {
                UsxNode::Text(t) => Some(t.as_str()),
                UsxNode::Element(_) => None,
            })
            .collect();
        assert_eq!(text, "Jude, a servant & brother");

        let verse = para.child_elements().next().unwrap();
        assert_eq!(verse.attr("number"), Some("1"));
        assert_eq!(verse.attr("sid"), Some("JUD 1:1"));
        assert_eq!(verse.attr("eid"), None);
    }

    #[test]
    fn test_missing_root() {
        let xml = r#"<book code="GEN" style="id"/>"#;
        assert_eq!(parse_usx(xml), Err(ConversionError::MissingRoot));
        assert_eq!(parse_usx(""), Err(ConversionError::MissingRoot));
    }

    #[test]
    fn test_missing_book() {
        let doc = parse_usx(r#"<usx version="3.0"><para style="p">x</para></usx>"#).unwrap();
        assert_eq!(doc.book_code(), Err(ConversionError::MissingBook));
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse_usx(r#"<usx><para style="p">text</usx>"#);
        assert!(matches!(result, Err(ConversionError::Xml(_))));
    }
}
