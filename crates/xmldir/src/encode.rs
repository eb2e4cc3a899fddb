//! Tree encoder: document → directory structure
//!
//! One directory per element, created in pre-order so a parent directory
//! always exists before its children. Attributes, text and tail land in side
//! files next to the child directories. Any filesystem failure is fatal and
//! aborts the traversal; partially written output is left as-is.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::order;
use crate::tree::{Document, Node};
use crate::ws;

/// Side file holding one `name=value` line per attribute
pub const ATTRIBUTES_FILE: &str = "0-attributes";

/// Encode a document as a directory structure under `base`
///
/// The root element becomes `base/<tag>` (no order suffix: the root has no
/// siblings); `base` itself must already exist. Fails if any directory to be
/// created already exists.
pub fn encode_to_dir(doc: &Document, base: &Path) -> Result<()> {
    encode_node(&doc.root, base, &doc.root.tag)
}

fn encode_node(node: &Node, parent: &Path, name: &str) -> Result<()> {
    let dir = parent.join(name);
    debug!(path = %dir.display(), "creating element directory");
    fs::create_dir(&dir).map_err(|e| Error::io(&dir, e))?;

    write_side_files(node, &dir)?;

    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        let child_name = order::encode_name(&child.tag, index, count);
        encode_node(child, &dir, &child_name)?;
    }
    Ok(())
}

fn write_side_files(node: &Node, dir: &Path) -> Result<()> {
    if !node.attributes.is_empty() {
        let mut lines = String::new();
        for (name, value) in &node.attributes {
            lines.push_str(name);
            lines.push('=');
            lines.push_str(value);
            lines.push('\n');
        }
        write_file(&dir.join(ATTRIBUTES_FILE), &lines)?;
    }

    write_content(dir, ws::Kind::Text, node.text.as_deref())?;
    write_content(dir, ws::Kind::Tail, node.tail.as_deref())?;
    Ok(())
}

/// Write the content/skeleton file pair for one text or tail string
///
/// The content file gets one trailing newline appended; the skeleton file is
/// written verbatim. Neither file is written when its half is empty.
fn write_content(dir: &Path, kind: ws::Kind, raw: Option<&str>) -> Result<()> {
    let Some(raw) = raw else { return Ok(()) };
    let (content, skeleton) = ws::split(raw);

    if let Some(content) = content {
        write_file(&dir.join(kind.content_file()), &format!("{content}\n"))?;
    }
    if !skeleton.is_empty() {
        write_file(&dir.join(kind.skeleton_file()), &skeleton)?;
    }
    Ok(())
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = Document::new(Node::new("root"));
        encode_to_dir(&doc, tmp.path()).unwrap();

        let err = encode_to_dir(&doc, tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn test_parent_created_before_children() {
        let tmp = tempfile::tempdir().unwrap();
        let mut root = Node::new("root");
        let mut mid = Node::new("mid");
        mid.children.push(Node::new("leaf"));
        root.children.push(mid);

        encode_to_dir(&Document::new(root), tmp.path()).unwrap();
        assert!(tmp.path().join("root/mid/leaf").is_dir());
    }

    #[test]
    fn test_empty_text_writes_no_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut root = Node::new("root");
        root.text = Some(String::new());

        encode_to_dir(&Document::new(root), tmp.path()).unwrap();
        let dir = tmp.path().join("root");
        assert!(!dir.join("0-text").exists());
        assert!(!dir.join(".text.ws").exists());
    }

    #[test]
    fn test_whitespace_only_text_writes_only_skeleton() {
        let tmp = tempfile::tempdir().unwrap();
        let mut root = Node::new("root");
        root.text = Some("\n  ".to_string());

        encode_to_dir(&Document::new(root), tmp.path()).unwrap();
        let dir = tmp.path().join("root");
        assert!(!dir.join("0-text").exists());
        assert_eq!(fs::read_to_string(dir.join(".text.ws")).unwrap(), "\n  ");
    }
}
