//! OpenDocument spreadsheet markup to CSV.
//!
//! Only a small part of the OpenDocument vocabulary is interpreted:
//!
//! ```text
//! <table:table-row>
//!   <table:table-cell office:value-type="float" office:value="12.5"/>
//!   <table:table-cell office:value-type="date" office:date-value="2009-01-22"/>
//!   <table:table-cell><text:p>Hello "World"</text:p></table:table-cell>
//! </table:table-row>
//! ```
//!
//! becomes `12.5,2009-01-22,"Hello ""World"""` followed by a newline. Float and
//! date cells are written bare from their value attributes; all other cells
//! are written as quoted paragraph text. Every closed row ends a record, even
//! when it had no cells.
//!
//! # Example
//!
//! ```
//! let xml = r#"<office:document-content
//!     xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
//!     xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
//!     xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
//!   <table:table-row>
//!     <table:table-cell office:value-type="float" office:value="3"/>
//!     <table:table-cell><text:p>three</text:p></table:table-cell>
//!   </table:table-row>
//! </office:document-content>"#;
//!
//! let mut out = Vec::new();
//! ods2csv::csv::transduce(xml.as_bytes(), &mut out)?;
//! assert_eq!(out, b"3,\"three\"\n");
//! # Ok::<(), ods2csv::Error>(())
//! ```

mod transducer;
mod writer;

pub use transducer::CsvTransducer;

use crate::error::Result;
use crate::markup::parse_markup;
use std::io::{BufRead, Write};

/// The OpenDocument `office:` namespace (cell value attributes).
pub const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// The OpenDocument `table:` namespace (rows and cells).
pub const TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// The OpenDocument `text:` namespace (cell paragraphs).
pub const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// Convert `content.xml` markup from `xml` into CSV written to `sink`.
///
/// The sink is flushed and dropped before this returns, whatever the outcome.
/// On failure a prefix of the CSV may already have been written.
pub fn transduce<R: BufRead, W: Write>(xml: R, sink: W) -> Result<()> {
    let mut transducer = CsvTransducer::new(sink);
    let parsed = parse_markup(xml, &mut transducer);
    transducer.finish(parsed)
}
