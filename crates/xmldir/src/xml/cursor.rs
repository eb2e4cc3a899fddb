//! Byte cursor with position tracking for the XML parser

use crate::error::Pos;

#[derive(Clone, Debug)]
pub(crate) struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current byte without consuming
    pub(crate) fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Whether the remaining input starts with `pattern`
    pub(crate) fn starts_with(&self, pattern: &[u8]) -> bool {
        self.input[self.pos..].starts_with(pattern)
    }

    /// Advance by one byte, tracking line and column
    pub(crate) fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    pub(crate) fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    /// Consume the byte if it matches
    pub(crate) fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(b) = self.current() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub(crate) const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    pub(crate) const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Current byte offset, usable with [`Cursor::slice_from`]
    pub(crate) const fn offset(&self) -> usize {
        self.pos
    }

    /// Input bytes from `start` up to the current position
    pub(crate) fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.pos]
    }
}
