//! Tree decoder: directory structure → document
//!
//! Decoding is independent of directory enumeration order: discovery only
//! collects paths, then every directory is read into an arena slot keyed by
//! path, parents are resolved through the path→id map once all entries are
//! registered, and children accumulate per parent as `(OrderKey, basename,
//! id)` bags that are sorted before attaching. Equal keys are broken by
//! basename so the result never depends on filesystem walk order.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::encode::ATTRIBUTES_FILE;
use crate::error::{Error, Result};
use crate::order::{self, OrderKey};
use crate::tree::{Document, Node};
use crate::ws;

/// Arena ids, indexes into the decode-local node arena
type NodeId = usize;

/// Decode the directory structure rooted at `root` into a document
///
/// `root` itself becomes the document root; its basename must be a plain tag
/// (any order suffix on it is parsed and discarded, since the root has no
/// siblings). No partial document is returned on failure.
pub fn decode_from_dir(root: &Path) -> Result<Document> {
    // Canonicalize so `.`-style arguments have a usable basename and parent
    // lookups see one spelling per directory.
    let root = root.canonicalize().map_err(|e| Error::io(root, e))?;
    let dirs = discover(&root)?;
    assemble_document(&root, dirs)
}

/// Collect every directory path in the subtree, the root included. Only
/// paths are gathered here; nothing depends on the order they come back in.
fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let file_type = entry.file_type().map_err(|e| Error::io(&entry.path(), e))?;
            if file_type.is_dir() {
                pending.push(entry.path());
            }
        }
        dirs.push(dir);
    }
    Ok(dirs)
}

/// Build the document from a set of discovered directory paths, in three
/// steps: read every entry into the arena, resolve each entry's parent
/// through the path→id map, then sort and attach the per-parent child bags.
/// A directory whose parent path is not among the entries is structural
/// corruption, reported as [`Error::LookupFailure`].
fn assemble_document(root: &Path, dirs: Vec<PathBuf>) -> Result<Document> {
    let mut arena: Vec<Option<Node>> = Vec::with_capacity(dirs.len());
    let mut entries: Vec<(PathBuf, OrderKey, String)> = Vec::with_capacity(dirs.len());
    let mut ids: HashMap<PathBuf, NodeId> = HashMap::new();

    for dir in dirs {
        let name = basename(&dir)?;
        let (tag, key) = order::parse_name(&name, &dir)?;
        debug!(path = %dir.display(), %tag, "reading element directory");

        let node = read_node(&dir, tag, dir == root)?;
        ids.insert(dir.clone(), arena.len());
        arena.push(Some(node));
        entries.push((dir, key, name));
    }

    let root_id = *ids
        .get(root)
        .ok_or_else(|| Error::lookup_failure(root))?;

    let mut bags: HashMap<NodeId, Vec<(OrderKey, String, NodeId)>> = HashMap::new();
    for (id, (dir, key, name)) in entries.into_iter().enumerate() {
        if id == root_id {
            continue;
        }
        let parent_id = dir
            .parent()
            .and_then(|parent| ids.get(parent))
            .copied()
            .ok_or_else(|| Error::lookup_failure(&dir))?;
        bags.entry(parent_id).or_default().push((key, name, id));
    }

    // All entries resolved: fix each parent's child order, then assemble.
    let mut children_of: Vec<Vec<NodeId>> = vec![Vec::new(); arena.len()];
    for (parent_id, mut bag) in bags {
        bag.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        children_of[parent_id] = bag.into_iter().map(|(_, _, id)| id).collect();
    }

    Ok(Document::new(assemble(root_id, &mut arena, &children_of)))
}

/// Move node `id` out of the arena with its sorted children attached
fn assemble(id: NodeId, arena: &mut [Option<Node>], children_of: &[Vec<NodeId>]) -> Node {
    let mut node = arena[id].take().unwrap_or_default();
    node.children = children_of[id]
        .iter()
        .map(|&child| assemble(child, arena, children_of))
        .collect();
    node
}

fn basename(dir: &Path) -> Result<String> {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_name(dir, "directory name is not valid unicode"))
}

/// Build a node from one directory's side files
fn read_node(dir: &Path, tag: String, is_root: bool) -> Result<Node> {
    let mut node = Node::new(tag);

    if let Some(raw) = read_optional(&dir.join(ATTRIBUTES_FILE))? {
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            // lines without `=` are silently skipped
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            if name.is_empty() {
                return Err(Error::invalid_name(dir, "empty attribute name"));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(Error::invalid_name(
                    dir,
                    format!("attribute name {name:?} contains whitespace"),
                ));
            }
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    node.text = read_content(dir, ws::Kind::Text)?;
    if !is_root {
        // tail is meaningless on the document root; stray files are ignored
        node.tail = read_content(dir, ws::Kind::Tail)?;
    }
    Ok(node)
}

/// Read one text or tail string back from its content/skeleton file pair
fn read_content(dir: &Path, kind: ws::Kind) -> Result<Option<String>> {
    let content = read_optional(&dir.join(kind.content_file()))?;
    let content = content.as_deref().map(strip_line_terminator);
    let skeleton = read_optional(&dir.join(kind.skeleton_file()))?;
    Ok(ws::merge(content, skeleton.as_deref()))
}

/// Drop the single line terminator appended when the content file was
/// written. Content never ends in whitespace, so at most one is present.
fn strip_line_terminator(raw: &str) -> &str {
    raw.strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_terminator() {
        assert_eq!(strip_line_terminator("hello\n"), "hello");
        assert_eq!(strip_line_terminator("hello\r\n"), "hello");
        assert_eq!(strip_line_terminator("hello"), "hello");
        assert_eq!(strip_line_terminator("a\nb\n"), "a\nb");
    }

    #[test]
    fn test_missing_side_files_are_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let node = read_node(tmp.path(), "root".to_string(), true).unwrap();
        assert!(node.attributes.is_empty());
        assert_eq!(node.text, None);
        assert_eq!(node.tail, None);
    }

    #[test]
    fn test_attribute_lines() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(ATTRIBUTES_FILE),
            "id=1\n\nnot a pair\nname=a=b\n",
        )
        .unwrap();

        let node = read_node(tmp.path(), "x".to_string(), false).unwrap();
        assert_eq!(node.attributes.get("id"), Some(&"1".to_string()));
        // value keeps everything after the first `=`
        assert_eq!(node.attributes.get("name"), Some(&"a=b".to_string()));
        assert_eq!(node.attributes.len(), 2);
    }

    #[test]
    fn test_attribute_name_with_whitespace_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(ATTRIBUTES_FILE), "my name=value\n").unwrap();

        let err = read_node(tmp.path(), "x".to_string(), false).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_empty_attribute_name_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(ATTRIBUTES_FILE), "=value\n").unwrap();

        let err = read_node(tmp.path(), "x".to_string(), false).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(err.to_string().contains("empty attribute name"));
    }

    #[test]
    fn test_unresolvable_parent_is_lookup_failure() {
        // an entry whose parent directory is missing from the discovered set
        // is structural corruption
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        let orphan = root.join("ghost").join("child");

        let err = assemble_document(&root, vec![root.clone(), orphan.clone()]).unwrap_err();
        match err {
            Error::LookupFailure { path } => assert_eq!(path, orphan),
            other => panic!("expected lookup failure, got {other}"),
        }
    }

    #[test]
    fn test_missing_root_entry_is_lookup_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        let child = root.join("child");
        fs::create_dir(&child).unwrap();

        let err = assemble_document(&root, vec![child]).unwrap_err();
        assert!(matches!(err, Error::LookupFailure { .. }));
    }

    #[test]
    fn test_assemble_document_ignores_entry_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::create_dir(root.join("a,0")).unwrap();
        fs::create_dir(root.join("b,1")).unwrap();

        // children listed before their parent
        let dirs = vec![root.join("b,1"), root.join("a,0"), root.clone()];
        let doc = assemble_document(&root, dirs).unwrap();
        let tags: Vec<&str> = doc.root.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn test_root_tail_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("0-tail"), "stray\n").unwrap();

        let node = read_node(tmp.path(), "root".to_string(), true).unwrap();
        assert_eq!(node.tail, None);
    }
}
