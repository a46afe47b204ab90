//! ZIP container access for ODS documents.
//!
//! An ODS file is a ZIP archive whose spreadsheet body lives in the
//! `content.xml` member. Two lookups are offered: a forward-only scan of the
//! local file headers, usable on pipes and standard input, and a lookup
//! through the central directory for seekable inputs.

mod stream;

use crate::error::{Error, Result};
use std::io::{Read, Seek};
use stream::LocalEntries;

/// Name of the ZIP member holding the spreadsheet body.
pub const CONTENT_ENTRY: &str = "content.xml";

/// Whether a ZIP entry is the spreadsheet body.
fn is_content_entry(name: &str, is_dir: bool) -> bool {
    !is_dir && name == CONTENT_ENTRY
}

/// Scan a ZIP stream for `content.xml` and hand its decompressed content to `f`.
///
/// Entries are read in stream order without seeking. The first non-directory
/// entry named exactly `content.xml` is passed to `f`, positioned at the start
/// of its data; entries before it are read through and checked. Entries
/// whose sizes follow their data in a data descriptor are supported. Input
/// that stops being a sequence of local file headers counts as an exhausted
/// stream.
///
/// # Errors
///
/// - [`Error::ContentEntryNotFound`] when the stream ends without a matching
///   entry;
/// - [`Error::ZipArchive`] for entries that cannot be read (unsupported
///   compression, encryption) and for checksum mismatches;
/// - [`Error::Io`] for read failures and truncated entries;
/// - whatever `f` returns.
///
/// # Example
///
/// ```no_run
/// use std::io::Read;
/// use ods2csv::container::with_content_stream;
///
/// let input = std::io::stdin().lock();
/// let xml = with_content_stream(input, |entry| {
///     let mut xml = String::new();
///     entry.read_to_string(&mut xml)?;
///     Ok(xml)
/// })?;
/// # Ok::<(), ods2csv::Error>(())
/// ```
pub fn with_content_stream<R, T, F>(input: R, f: F) -> Result<T>
where
    R: Read,
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    let mut entries = LocalEntries::new(input);
    let mut skipped = 0usize;

    while let Some(entry) = entries.next_entry()? {
        if is_content_entry(&entry.name, entry.is_dir()) {
            tracing::debug!(skipped, "located content.xml in ZIP stream");
            let mut data = entries.data(&entry)?;
            let value = f(&mut data)?;
            data.finish()?;
            return Ok(value);
        }
        entries.skip(&entry)?;
        skipped += 1;
    }

    Err(Error::ContentEntryNotFound)
}

/// Look up `content.xml` through the ZIP central directory.
///
/// Entries are visited in directory order and the first non-directory entry
/// named `content.xml` wins, matching [`with_content_stream`]. Only the
/// matching entry is read; the others are not decompressed or checked.
pub fn with_content_archive<R, T, F>(input: R, f: F) -> Result<T>
where
    R: Read + Seek,
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    let mut archive = zip::ZipArchive::new(input)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if is_content_entry(entry.name(), entry.is_dir()) {
            tracing::debug!(index, "located content.xml in ZIP archive");
            return f(&mut entry);
        }
    }

    Err(Error::ContentEntryNotFound)
}
