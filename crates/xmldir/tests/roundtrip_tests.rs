//! Encode-then-decode round trips through a real directory tree

use std::fs;

use xmldir::{decode_from_dir, encode_to_dir, from_xml_str, to_xml_string, Document, Node};

fn roundtrip(doc: &Document) -> Document {
    let tmp = tempfile::tempdir().unwrap();
    encode_to_dir(doc, tmp.path()).unwrap();
    decode_from_dir(&tmp.path().join(&doc.root.tag)).unwrap()
}

#[test]
fn test_minimal_document() {
    let doc = Document::new(Node::new("root"));
    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_sibling_suffix_and_attribute_layout() {
    // root with text "" and children a (id=1) then b
    let mut root = Node::new("root");
    root.text = Some(String::new());
    let mut a = Node::new("a");
    a.attributes.insert("id".to_string(), "1".to_string());
    root.children.push(a);
    root.children.push(Node::new("b"));
    let doc = Document::new(root);

    let tmp = tempfile::tempdir().unwrap();
    encode_to_dir(&doc, tmp.path()).unwrap();

    assert!(tmp.path().join("root").is_dir());
    assert!(tmp.path().join("root/a,0").is_dir());
    assert!(tmp.path().join("root/b,1").is_dir());
    assert_eq!(
        fs::read_to_string(tmp.path().join("root/a,0/0-attributes")).unwrap(),
        "id=1\n"
    );

    let decoded = decode_from_dir(&tmp.path().join("root")).unwrap();
    assert_eq!(decoded.root.children.len(), 2);
    assert_eq!(decoded.root.children[0].tag, "a");
    assert_eq!(
        decoded.root.children[0].attributes.get("id"),
        Some(&"1".to_string())
    );
    assert_eq!(decoded.root.children[1].tag, "b");
    // empty text encodes to no files and decodes as absent
    assert_eq!(decoded.root.text, None);
}

#[test]
fn test_single_child_omits_suffix() {
    let mut root = Node::new("root");
    root.children.push(Node::new("only"));
    let doc = Document::new(root);

    let tmp = tempfile::tempdir().unwrap();
    encode_to_dir(&doc, tmp.path()).unwrap();
    assert!(tmp.path().join("root/only").is_dir());
    assert!(!tmp.path().join("root/only,0").exists());

    assert_eq!(decode_from_dir(&tmp.path().join("root")).unwrap(), doc);
}

#[test]
fn test_whitespace_exactness() {
    let mut root = Node::new("root");
    root.text = Some("  hello  ".to_string());
    let doc = Document::new(root);

    let decoded = roundtrip(&doc);
    assert_eq!(decoded.root.text.as_deref(), Some("  hello  "));
}

#[test]
fn test_text_and_tails_roundtrip() {
    let doc = from_xml_str("<root>\n  lead <a>inner</a> mid\n  <b/> end\n</root>").unwrap();
    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_deep_nesting_roundtrip() {
    let doc = from_xml_str(
        "<cfg><servers><server host=\"a\"><port>80</port></server>\
         <server host=\"b\"><port>81</port></server></servers><flag/></cfg>",
    )
    .unwrap();
    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_string_level_roundtrip_of_canonical_document() {
    let canonical = "<library>\n  <book id=\"1\">\n    <title>Dune</title>\n  </book>\n  <book id=\"2\"/>\n</library>";
    let doc = from_xml_str(canonical).unwrap();
    let decoded = roundtrip(&doc);
    assert_eq!(to_xml_string(&decoded), canonical);
}

#[test]
fn test_attribute_set_roundtrips() {
    let mut root = Node::new("root");
    root.attributes.insert("b".to_string(), "2".to_string());
    root.attributes.insert("a".to_string(), "1".to_string());
    root.attributes
        .insert("href".to_string(), "x?a=1&b=2".to_string());
    let doc = Document::new(root);

    let decoded = roundtrip(&doc);
    assert_eq!(decoded.root.attributes, doc.root.attributes);
}

#[test]
fn test_repeated_sibling_tags() {
    let doc = from_xml_str("<l><i>1</i><i>2</i><i>3</i></l>").unwrap();
    let tmp = tempfile::tempdir().unwrap();
    encode_to_dir(&doc, tmp.path()).unwrap();

    assert!(tmp.path().join("l/i,0").is_dir());
    assert!(tmp.path().join("l/i,1").is_dir());
    assert!(tmp.path().join("l/i,2").is_dir());
    assert_eq!(decode_from_dir(&tmp.path().join("l")).unwrap(), doc);
}
