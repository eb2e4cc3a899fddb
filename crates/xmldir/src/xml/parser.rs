//! XML parser producing the text/tail model
//!
//! Whitespace-only character runs are kept verbatim: the directory codec
//! needs them to reproduce the document exactly. Comments, processing
//! instructions and the document prolog are skipped, not preserved.

use indexmap::IndexMap;

use crate::error::{Error, Pos, Result};
use crate::tree::{Document, Node};
use crate::xml::cursor::Cursor;

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser over raw document bytes
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse a complete document: prolog, one root element, trailing misc
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_misc()?;
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("trailing content after document root"));
        }

        Ok(Document::new(root))
    }

    fn parse_element(&mut self) -> Result<Node> {
        self.expect(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let tag = self.parse_name()?;
        let mut node = Node::new(tag);
        node.attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect(b'>')?;
            return Ok(node);
        }
        self.expect(b'>')?;

        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close = self.parse_name()?;
                if close != node.tag {
                    return Err(self.error_here("mismatched closing tag"));
                }
                self.cursor.skip_whitespace();
                self.expect(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let raw = self.take_until(b"]]>")?;
                let run = bytes_to_string(raw, self.cursor.position())?;
                append_run(&mut node, &run);
                continue;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.take_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.take_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                node.children.push(child);
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated element"));
            }

            let run = self.parse_text()?;
            append_run(&mut node, &run);
        }

        Ok(node)
    }

    /// One raw character run, up to the next `<`, with entities decoded
    fn parse_text(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.offset();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = bytes_to_string(self.cursor.slice_from(start), pos)?;
        decode_entities(&raw, pos)
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here("duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let pos = self.cursor.position();
        let start = self.cursor.offset();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = bytes_to_string(self.cursor.slice_from(start), pos)?;
                self.cursor.advance();
                return decode_entities(&raw, pos);
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.offset();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            _ => return Err(self.error_here("expected name")),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), pos)
    }

    /// Skip whitespace, the XML declaration, doctype and comments around the
    /// root element. None of these are preserved.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.take_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.take_until(b"-->")?;
            } else if self.cursor.starts_with(b"<!") {
                self.cursor.advance_by(2);
                self.take_until(b">")?;
            } else {
                return Ok(());
            }
        }
    }

    /// Consume input up to and including `pattern`, returning the bytes
    /// before it
    fn take_until(&mut self, pattern: &[u8]) -> Result<&'a [u8]> {
        let start = self.cursor.offset();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return Ok(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        Error::parse(self.cursor.position(), message)
    }
}

/// Attach a character run at the current parse position: before the first
/// child it extends the element's text, afterwards the last child's tail.
/// Runs split by a skipped comment collapse into one.
fn append_run(node: &mut Node, run: &str) {
    let slot = match node.children.last_mut() {
        None => &mut node.text,
        Some(last) => &mut last.tail,
    };
    match slot {
        Some(existing) => existing.push_str(run),
        None => *slot = Some(run.to_string()),
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::parse(pos, "invalid utf-8"))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }
        if !terminated {
            return Err(Error::parse(pos, "unterminated entity reference"));
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::parse(pos, format!("invalid entity &{entity};")));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
