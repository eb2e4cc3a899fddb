//! xmldir - Edit XML documents as a directory structure
//!
//! An XML document maps to a directory tree: one directory per element
//! (sibling order encoded in the name, `tag,index`), with side files for
//! attributes (`0-attributes`), text and tail content (`0-text`/`0-tail`
//! plus hidden `.text.ws`/`.tail.ws` whitespace skeletons). Decoding the
//! directory tree reproduces the document exactly, surrounding whitespace
//! included.
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> xmldir::Result<()> {
//! let dir = tempfile::tempdir().unwrap();
//! let doc = xmldir::from_xml_str("<root>\n  <a id=\"1\"/>\n  <b/>\n</root>")?;
//! xmldir::encode_to_dir(&doc, dir.path())?;
//!
//! let decoded = xmldir::decode_from_dir(&dir.path().join("root"))?;
//! assert_eq!(decoded, doc);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Pos, Result};

pub mod tree;
pub use tree::{Document, Node};

pub mod order;
pub use order::OrderKey;

pub mod ws;

pub mod xml;
pub use xml::{write_document, Parser as XmlParser};

pub mod encode;
pub use encode::encode_to_dir;

pub mod decode;
pub use decode::decode_from_dir;

/// Parse an XML document from a string
pub fn from_xml_str(s: &str) -> Result<Document> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse an XML document from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<Document> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Serialize a document to its canonical XML string
pub fn to_xml_string(doc: &Document) -> String {
    write_document(doc)
}
