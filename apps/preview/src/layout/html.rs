//! HTML fragment parsing for the measurer, built on `quick_xml` events.
//!
//! Fragments come from the content-flattening step, so they are small and
//! well-formed apart from HTML habits an XML reader rejects by default. The
//! tree builder tolerates those: void elements like `<br>` take no end tag,
//! end tags with no open element are dropped, and elements still open at the
//! end of input are closed there. Markup the reader cannot tokenize at all
//! (an unterminated tag, say) is an error.

use std::borrow::Cow;

use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "meta", "link", "input", "col", "wbr"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

/// Open elements plus the finished top-level nodes.
#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn siblings(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn attach(&mut self, node: Node) {
        self.siblings().push(node);
    }

    /// Entity references arrive as separate events; adjacent runs merge.
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let siblings = self.siblings();
        if let Some(Node::Text(last)) = siblings.last_mut() {
            last.push_str(text);
        } else {
            siblings.push(Node::Text(text.to_string()));
        }
    }

    fn open(&mut self, element: Element) {
        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            self.attach(Node::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn close(&mut self, tag: &str) {
        let Some(depth) = self.stack.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        while self.stack.len() > depth {
            if let Some(done) = self.stack.pop() {
                self.attach(Node::Element(done));
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while let Some(done) = self.stack.pop() {
            self.attach(Node::Element(done));
        }
        self.roots
    }
}

/// Parses an HTML fragment into a node forest.
pub fn parse_fragment(html: &str) -> Result<Vec<Node>, quick_xml::Error> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    // HTML is not XML: `<br>` has no end tag and stray end tags happen.
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut tree = TreeBuilder::default();
    let mut entity_buf = String::with_capacity(16);

    loop {
        match reader.read_event()? {
            Event::Start(e) => tree.open(element_from_start(&reader, &e)?),
            Event::Empty(e) => {
                let element = element_from_start(&reader, &e)?;
                tree.attach(Node::Element(element));
            }
            Event::End(e) => {
                let tag = decode_tag_name(&reader, e.name().as_ref())?;
                tree.close(&tag);
            }
            Event::Text(e) => tree.text(&e.decode()?),
            Event::CData(e) => tree.text(&reader.decoder().decode(&e)?),
            Event::GeneralRef(e) => {
                let name = e.decode()?;
                entity_buf.clear();
                entity_buf.push('&');
                entity_buf.push_str(&name);
                entity_buf.push(';');
                // Unknown entities stay as written.
                let resolved = unescape_with(&entity_buf, resolve_html_entity)
                    .unwrap_or(Cow::Borrowed(entity_buf.as_str()));
                tree.text(&resolved);
            }
            Event::Eof => break,
            // comments, doctype, processing instructions
            _ => {}
        }
    }
    Ok(tree.finish())
}

/// The XML entities plus the one HTML entity the content step can produce.
fn resolve_html_entity(name: &str) -> Option<&'static str> {
    resolve_predefined_entity(name).or(match name {
        "nbsp" => Some("\u{a0}"),
        _ => None,
    })
}

fn decode_tag_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, quick_xml::Error> {
    let decoded = reader.decoder().decode(raw)?;
    Ok(decoded.to_ascii_lowercase())
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<Element, quick_xml::Error> {
    let tag = decode_tag_name(reader, e.name().as_ref())?;
    let mut classes = Vec::new();
    for attr in e.attributes().flatten() {
        if !attr.key.as_ref().eq_ignore_ascii_case(b"class") {
            continue;
        }
        if let Ok(value) = reader.decoder().decode(&attr.value) {
            classes = value.split_whitespace().map(str::to_string).collect();
        }
    }
    Ok(Element {
        tag,
        classes,
        children: Vec::new(),
    })
}

/// The text a reader sees, whitespace-normalized to single spaces.
#[cfg(test)]
pub fn visible_text(html: &str) -> String {
    fn collect(nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => {
                    // br and block boundaries separate words
                    out.push(' ');
                    collect(&e.children, out);
                    out.push(' ');
                }
            }
        }
    }

    let nodes = parse_fragment(html).expect("well-formed fragment");
    let mut raw = String::new();
    collect(&nodes, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
