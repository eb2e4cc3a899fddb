//! Ordering codec
//!
//! A node's position among its siblings is embedded in its directory name:
//! an only child is named `tag`, every other node `tag,index` with its
//! zero-based position. Decoding accepts the richer form `tag,c1,c2,...`
//! where the comma-separated components form a float sort key, so users can
//! reorder or insert siblings by hand (`item,1.5` sorts between `item,1` and
//! `item,2`) without renumbering the rest.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{Error, Result};
use crate::xml;

/// Sort key ordering a node among its siblings
///
/// A non-empty sequence of float components, compared lexicographically with
/// a total order on floats. A shorter key that is a prefix of a longer one
/// sorts first. The default key `(0,)` belongs to names without a suffix.
#[derive(Clone, Debug)]
pub struct OrderKey(Vec<f64>);

impl OrderKey {
    pub fn components(&self) -> &[f64] {
        &self.0
    }
}

impl Default for OrderKey {
    fn default() -> Self {
        Self(vec![0.0])
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.total_cmp(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// Directory name for the node at `index` among `sibling_count` siblings
///
/// An only child gets no suffix; the document root always encodes as an only
/// child.
pub fn encode_name(tag: &str, index: usize, sibling_count: usize) -> String {
    if sibling_count > 1 {
        format!("{tag},{index}")
    } else {
        tag.to_string()
    }
}

/// Parse a directory basename into `(tag, OrderKey)`
///
/// The basename splits on the first `,`: the prefix is the tag, the
/// remainder the order components. An empty remainder (trailing comma) is a
/// single component `0`; no comma at all yields the default key. `path` is
/// the directory the name came from, reported on failure.
pub fn parse_name(name: &str, path: &Path) -> Result<(String, OrderKey)> {
    let (tag, key) = match name.split_once(',') {
        None => (name, OrderKey::default()),
        Some((tag, "")) => (tag, OrderKey::default()),
        Some((tag, rest)) => {
            let mut components = Vec::with_capacity(1);
            for part in rest.split(',') {
                let value = part.parse::<f64>().map_err(|_| {
                    Error::invalid_name(path, format!("non-numeric order component {part:?}"))
                })?;
                components.push(value);
            }
            (tag, OrderKey(components))
        }
    };
    validate_tag(tag, path)?;
    Ok((tag.to_string(), key))
}

/// Defer tag validity to the document grammar itself: an empty element with
/// this tag must parse back to exactly itself.
fn validate_tag(tag: &str, path: &Path) -> Result<()> {
    let probe = format!("<{tag}/>");
    let mut parser = xml::Parser::new(probe.as_bytes());
    match parser.parse() {
        Ok(doc)
            if doc.root.tag == tag
                && doc.root.attributes.is_empty()
                && doc.root.children.is_empty() =>
        {
            Ok(())
        }
        _ => Err(Error::invalid_name(
            path,
            format!("{tag:?} is not a valid element name"),
        )),
    }
}
