//! Canonical XML serializer
//!
//! The inverse of the parser, in canonical form: attributes double-quoted in
//! stored order, empty elements self-closing, text escaped with the minimal
//! entity set the parser decodes.

use crate::tree::{Document, Node};

/// Serialize a document to its canonical string form
pub fn write_document(doc: &Document) -> String {
    let mut out = String::new();
    write_element(&doc.root, &mut out);
    out
}

fn write_element(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, out, true);
        out.push('"');
    }

    if node.text.is_none() && node.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        if let Some(text) = &node.text {
            escape_into(text, out, false);
        }
        for child in &node.children {
            write_element(child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }

    if let Some(tail) = &node.tail {
        escape_into(tail, out, false);
    }
}

fn escape_into(raw: &str, out: &mut String, in_attribute: bool) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            ch => out.push(ch),
        }
    }
}
