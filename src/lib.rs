//! # ods2csv
//!
//! Streaming OpenDocument Spreadsheet (ODS) to CSV conversion.
//!
//! An ODS document is a ZIP archive; its cells live in the `content.xml`
//! member. ods2csv finds that member, reads it with a forward-only XML parser
//! and writes CSV as rows close, without building a document tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::io;
//!
//! // Pipe an ODS document from stdin to CSV on stdout
//! ods2csv::convert(io::stdin().lock(), io::stdout().lock())?;
//!
//! // File to file; the output only appears if conversion succeeds
//! ods2csv::convert_file("prices.ods", "prices.csv")?;
//!
//! // In memory
//! let data = std::fs::read("prices.ods")?;
//! let csv = ods2csv::convert_bytes(&data)?;
//! println!("{}", csv);
//! # Ok::<(), ods2csv::Error>(())
//! ```
//!
//! ## Output
//!
//! - fields are separated by `,` and rows end with `\n`;
//! - float and date cells are written exactly as their `office:value` /
//!   `office:date-value` attributes;
//! - all other cells are written as `"`-quoted paragraph text with embedded
//!   `"` doubled.
//!
//! ## Features
//!
//! - `ffi`: C-ABI bindings for foreign language integration

pub mod batch;
pub mod container;
pub mod csv;
pub mod error;
pub mod markup;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use batch::{convert_dir, BatchOptions, BatchReport, FileFailure};
pub use error::{Error, MarkupIssue, Result};

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

/// Convert an ODS document read from `input` into CSV written to `output`.
///
/// `input` is read strictly forward, so pipes and standard input work,
/// including archives written by streaming ZIP writers. `input` is buffered
/// internally; `output` is not, so wrap it in a `BufWriter` where that
/// matters.
///
/// # Errors
///
/// - [`Error::ContentEntryNotFound`] if the archive has no `content.xml`;
/// - [`Error::MarkupProcessingFailed`] if `content.xml` cannot be processed;
/// - [`Error::Io`] / [`Error::ZipArchive`] for read, write and container errors.
///
/// On failure `output` may hold a prefix of the CSV.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use std::io::BufWriter;
///
/// let input = File::open("report.ods")?;
/// let output = BufWriter::new(File::create("report.csv")?);
/// ods2csv::convert(input, output)?;
/// # Ok::<(), ods2csv::Error>(())
/// ```
pub fn convert<R: Read, W: Write>(input: R, output: W) -> Result<()> {
    container::with_content_stream(input, |entry| csv::transduce(BufReader::new(entry), output))
}

/// Convert an ODS document from a seekable source.
///
/// Uses the ZIP central directory to find `content.xml`, which also works for
/// archives whose local headers do not record entry sizes.
pub fn convert_seekable<R: Read + Seek, W: Write>(input: R, output: W) -> Result<()> {
    container::with_content_archive(input, |entry| csv::transduce(BufReader::new(entry), output))
}

/// Convert an in-memory ODS document to a CSV string.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("report.ods")?;
/// let csv = ods2csv::convert_bytes(&data)?;
/// # Ok::<(), ods2csv::Error>(())
/// ```
pub fn convert_bytes(data: &[u8]) -> Result<String> {
    let mut out = Vec::new();
    convert_seekable(Cursor::new(data), &mut out)?;
    String::from_utf8(out).map_err(|e| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Convert the ODS file at `input` into a CSV file at `output`.
///
/// The CSV is written to a temporary file in the output's directory and moved
/// into place only once conversion has succeeded, so a failure never leaves a
/// partial `output` behind (an existing `output` is left untouched).
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let source = BufReader::new(File::open(input)?);
    let mut staged = std::io::BufWriter::new(tempfile::NamedTempFile::new_in(dir)?);

    convert_seekable(source, &mut staged)?;

    let staged = staged.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    staged.persist(output).map_err(|e| Error::Io(e.error))?;

    tracing::debug!(input = %input.display(), output = %output.display(), "converted file");
    Ok(())
}
