//! DOM to HTML serialization.
//!
//! A plain document walk: void elements close implicitly, script/style
//! contents pass through unescaped, everything else gets entity-escaped
//! text and attribute values.

use std::fmt::Write;

use crate::dom::{Dom, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize a document tree back to an HTML string.
#[must_use]
pub fn serialize(dom: &Dom) -> String {
    let mut out = String::with_capacity(4096);
    for child in dom.children(dom.document()) {
        serialize_node(dom, child, &mut out, false);
    }
    out
}

fn serialize_node(dom: &Dom, id: NodeId, out: &mut String, raw_text: bool) {
    let Some(node) = dom.get(id) else { return };
    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_node(dom, child, out, raw_text);
            }
        }
        NodeData::Doctype { name } => {
            let _ = write!(out, "<!DOCTYPE {name}>");
        }
        NodeData::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeData::Element { name, attrs } => {
            let local = name.local.as_ref();
            out.push('<');
            out.push_str(local);
            for attr in attrs {
                let _ = write!(
                    out,
                    " {}=\"{}\"",
                    attr.name.local.as_ref(),
                    escape_attr(&attr.value)
                );
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&local) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&local);
            for child in dom.children(id) {
                serialize_node(dom, child, out, raw);
            }

            let _ = write!(out, "</{local}>");
        }
    }
}

fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sink::parse_html;

    #[test]
    fn test_roundtrip_simple_document() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head><body><p>Hello</p></body></html>";
        let out = serialize(&parse_html(html));
        assert_eq!(out, html);
    }

    #[test]
    fn test_void_elements_close_implicitly() {
        let out = serialize(&parse_html(r#"<body><img src="a.png"><br><hr></body>"#));
        assert!(out.contains(r#"<img src="a.png">"#));
        assert!(!out.contains("</img>"));
        assert!(!out.contains("</br>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let out = serialize(&parse_html("<p>a &amp; b &lt; c</p>"));
        assert!(out.contains("a &amp; b &lt; c"));
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let mut dom = parse_html("<p>x</p>");
        let p = dom.elements_by_tag("p")[0];
        dom.set_attr(p, "title", "say \"hi\"");
        let out = serialize(&dom);
        assert!(out.contains(r#"title="say &quot;hi&quot;""#));
    }

    #[test]
    fn test_script_content_not_escaped() {
        let out = serialize(&parse_html("<body><script>if (a < b && c > d) {}</script></body>"));
        assert!(out.contains("<script>if (a < b && c > d) {}</script>"));
    }

    #[test]
    fn test_comment_preserved() {
        let out = serialize(&parse_html("<body><!-- note --></body>"));
        assert!(out.contains("<!-- note -->"));
    }
}
