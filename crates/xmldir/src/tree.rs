//! Document data model
//!
//! Elements follow the text/tail model: `text` is the raw content between an
//! element's start tag and its first child, `tail` is the raw content between
//! the element's end tag and the next sibling (or the parent's end tag).
//! Whitespace-only runs are kept verbatim; the directory codec depends on
//! them to round-trip documents exactly.

use indexmap::IndexMap;

/// One element of the document tree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    /// Raw content before the first child, if any
    pub text: Option<String>,
    /// Raw content after this element's end tag, if any.
    /// Always `None` on a document root.
    pub tail: Option<String>,
    /// Ordered children; order is semantically significant
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }
}

/// A document: a single root element, nothing else
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub const fn new(root: Node) -> Self {
        Self { root }
    }
}
