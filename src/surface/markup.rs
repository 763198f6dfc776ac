//! Markup parsing and serialization for the headless surface
//!
//! Body markup is read as an XHTML fragment with roxmltree (wrapped in a
//! synthetic `<body>` so several top-level blocks are allowed) and written back
//! with quick-xml's escaping. Void elements are written self-closed (`<br/>`)
//! so the output parses again.

use quick_xml::escape::escape;
use roxmltree::Document as XmlDocument;
use thiserror::Error;

use super::tree::{NodeId, NodeKind, Tree};
use crate::host::HostError;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "wbr"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    /// Markup is not a well-formed fragment
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),
}

impl From<MarkupError> for HostError {
    fn from(err: MarkupError) -> Self {
        HostError::Markup(err.to_string())
    }
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Parse `markup` into detached nodes of `tree`
///
/// Nothing is attached anywhere, so a parse failure leaves the tree's live
/// content untouched.
pub fn parse_fragment(tree: &mut Tree, markup: &str) -> Result<Vec<NodeId>, MarkupError> {
    let wrapped = format!("<body>{}</body>", markup);
    let doc = XmlDocument::parse(&wrapped)
        .map_err(|e| MarkupError::InvalidMarkup(format!("XML parse error: {}", e)))?;

    let mut nodes = Vec::new();
    for child in doc.root_element().children() {
        if let Some(id) = build_node(tree, child) {
            nodes.push(id);
        }
    }
    Ok(nodes)
}

fn build_node(tree: &mut Tree, node: roxmltree::Node) -> Option<NodeId> {
    if node.is_text() {
        return Some(tree.create_text(node.text().unwrap_or_default()));
    }
    if !node.is_element() {
        // Comments and processing instructions are dropped
        return None;
    }

    let id = tree.create_element(node.tag_name().name());
    for attr in node.attributes() {
        let result = if attr.name() == "style" {
            parse_style(attr.value())
                .into_iter()
                .try_for_each(|(name, value)| tree.set_style(id, &name, &value))
        } else {
            tree.set_attribute(id, attr.name(), attr.value())
        };
        if let Err(e) = result {
            log::debug!("Dropping attribute '{}': {}", attr.name(), e);
        }
    }
    for child in node.children() {
        if let Some(child_id) = build_node(tree, child) {
            if let Err(e) = tree.append(id, child_id) {
                log::debug!("Dropping child of <{}>: {}", node.tag_name().name(), e);
            }
        }
    }
    Some(id)
}

/// Split a `style` attribute into `(property, value)` declarations
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .collect()
}

/// Serialize the children of `id` (the `innerHTML` of an element)
pub fn serialize_children(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    for child in tree.children(id) {
        write_node(tree, *child, &mut out);
    }
    out
}

fn write_node(tree: &Tree, id: NodeId, out: &mut String) {
    match tree.kind(id) {
        NodeKind::Text(text) => out.push_str(&escape(text.as_str())),
        NodeKind::Document => out.push_str(&serialize_children(tree, id)),
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            if !data.style.is_empty() {
                let style: Vec<String> = data
                    .style
                    .iter()
                    .map(|(name, value)| format!("{}: {};", name, value))
                    .collect();
                out.push_str(&format!(" style=\"{}\"", escape(style.join(" ").as_str())));
            }
            for (name, value) in &data.attributes {
                out.push_str(&format!(" {}=\"{}\"", name, escape(value.as_str())));
            }

            if is_void_tag(&data.tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in tree.children(id) {
                write_node(tree, *child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(markup: &str) -> String {
        let mut tree = Tree::new();
        let body = tree.create_element("div");
        for node in parse_fragment(&mut tree, markup).unwrap() {
            tree.append(body, node).unwrap();
        }
        serialize_children(&tree, body)
    }

    #[test]
    fn test_parse_and_serialize_blocks() {
        let markup = r#"<h1>Title</h1><p>Some <b>bold</b> text<br/></p>"#;
        assert_eq!(round_trip(markup), markup);
    }

    #[test]
    fn test_style_attribute_is_normalized() {
        let out = round_trip(r#"<p><span style="COLOR:red;font-size : 12pt">x</span></p>"#);
        assert_eq!(out, r#"<p><span style="color: red; font-size: 12pt;">x</span></p>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let out = round_trip("<p>a &lt; b &amp; c</p>");
        assert_eq!(out, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        let mut tree = Tree::new();
        assert!(parse_fragment(&mut tree, "<p>unclosed").is_err());
        assert!(parse_fragment(&mut tree, "<p>&nbsp;</p>").is_err());
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            parse_style("color: #fff; ; font-family: Arial, sans-serif"),
            vec![
                ("color".to_string(), "#fff".to_string()),
                ("font-family".to_string(), "Arial, sans-serif".to_string()),
            ]
        );
    }
}
