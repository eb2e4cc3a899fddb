//! XML parsing and serialization for the text/tail document model

mod cursor;
pub mod parser;
pub mod writer;

pub use parser::Parser;
pub use writer::write_document;
