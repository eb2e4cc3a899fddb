//! Error types for xmldir

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Position in an XML source document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

/// Main error type for xmldir
///
/// Every traversal error is fatal: an encode or decode aborts on the first
/// failure and returns no partial result.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed directory name or attribute name.
    #[error("invalid name at {}: {message}", .path.display())]
    InvalidName { path: PathBuf, message: String },

    /// A directory's parent path was never recorded during the walk.
    #[error("no parent recorded for {}", .path.display())]
    LookupFailure { path: PathBuf },

    /// XML syntax error.
    #[error("parse error at {pos}: {message}")]
    Parse { pos: Pos, message: String },

    /// Filesystem failure, carrying the failing path.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn invalid_name(path: &Path, message: impl Into<String>) -> Self {
        Self::InvalidName {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn lookup_failure(path: &Path) -> Self {
        Self::LookupFailure {
            path: path.to_path_buf(),
        }
    }

    pub fn parse(pos: Pos, message: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type alias for xmldir
pub type Result<T> = std::result::Result<T, Error>;
