//! Low-level CSV output.

use crate::error::Result;
use std::io::Write;

/// Writes CSV fields and records to an underlying sink.
///
/// Bare values go out as-is; quoted values have every `"` doubled. Nothing
/// else is escaped, since quoted fields may hold separators and line breaks.
pub(crate) struct CsvWriter<W: Write> {
    inner: W,
    records: u64,
}

impl<W: Write> CsvWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    pub(crate) fn separator(&mut self) -> Result<()> {
        self.inner.write_all(b",")?;
        Ok(())
    }

    pub(crate) fn bare(&mut self, value: &str) -> Result<()> {
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }

    pub(crate) fn quote(&mut self) -> Result<()> {
        self.inner.write_all(b"\"")?;
        Ok(())
    }

    /// Write text inside an open quoted field.
    pub(crate) fn quoted_text(&mut self, text: &str) -> Result<()> {
        let mut pieces = text.split('"');
        if let Some(first) = pieces.next() {
            self.inner.write_all(first.as_bytes())?;
        }
        for piece in pieces {
            self.inner.write_all(b"\"\"")?;
            self.inner.write_all(piece.as_bytes())?;
        }
        Ok(())
    }

    pub(crate) fn end_record(&mut self) -> Result<()> {
        self.inner.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    pub(crate) fn records(&self) -> u64 {
        self.records
    }

    /// Flush and release the sink. Flush failures are logged, not returned.
    pub(crate) fn close(mut self) {
        if let Err(e) = self.inner.flush() {
            tracing::warn!(error = %e, "failed to flush CSV output");
        }
    }
}
