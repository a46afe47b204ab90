//! Spreadsheet markup to CSV state machine.

use super::writer::CsvWriter;
use super::{OFFICE_NS, TABLE_NS, TEXT_NS};
use crate::error::{Error, MarkupIssue, Result};
use crate::markup::{Attributes, MarkupHandler, QualifiedName};
use std::io::Write;

/// How a cell's value reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellKind {
    /// Float or date; the value attribute was written when the cell opened.
    Typed,
    /// Everything else; paragraph text is written as a quoted field.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Idle,
    InRow { had_cell: bool },
    InCell { kind: CellKind },
    InCellText { kind: CellKind },
}

/// Markup handler that turns `table:table-row` / `table:table-cell` /
/// `text:p` events into CSV.
pub struct CsvTransducer<W: Write> {
    out: CsvWriter<W>,
    state: State,
    first_error: Option<MarkupIssue>,
}

impl<W: Write> CsvTransducer<W> {
    /// Create a transducer writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            out: CsvWriter::new(sink),
            state: State::Idle,
            first_error: None,
        }
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> u64 {
        self.out.records()
    }

    /// Settle the outcome of a parse and release the sink.
    ///
    /// A failure returned by the event source takes precedence over the
    /// first error reported through the callbacks. The sink is flushed and
    /// dropped on every path.
    pub fn finish(self, parsed: Result<()>) -> Result<()> {
        let rows = self.rows();
        self.out.close();

        match (parsed, self.first_error) {
            (Err(e), _) => Err(e),
            (Ok(()), Some(issue)) => Err(Error::MarkupProcessingFailed(issue)),
            (Ok(()), None) => {
                tracing::debug!(rows, "converted content.xml");
                Ok(())
            }
        }
    }

    fn record_error(&mut self, issue: MarkupIssue) {
        if self.first_error.is_none() {
            self.first_error = Some(issue);
        }
    }

    /// Close the quoted region of a text cell's paragraph, if one is open.
    fn leave_text(&mut self) -> Result<()> {
        if self.state == (State::InCellText { kind: CellKind::Text }) {
            self.out.quote()?;
        }
        Ok(())
    }

    fn open_cell(&mut self, had_cell: bool, attributes: &Attributes) -> Result<()> {
        if had_cell {
            self.out.separator()?;
        }

        let value_attr = match attributes.get(OFFICE_NS, "value-type") {
            Some("float") => Some("value"),
            Some("date") => Some("date-value"),
            _ => None,
        };

        let kind = match value_attr {
            Some(name) => {
                match attributes.get(OFFICE_NS, name) {
                    Some(value) => self.out.bare(value)?,
                    None => self.record_error(MarkupIssue::unplaced(format!(
                        "typed cell without office:{} attribute",
                        name
                    ))),
                }
                CellKind::Typed
            }
            None => CellKind::Text,
        };

        self.state = State::InCell { kind };
        Ok(())
    }
}

impl<W: Write> MarkupHandler for CsvTransducer<W> {
    fn start_element(&mut self, name: QualifiedName<'_>, attributes: &Attributes) -> Result<()> {
        if name.is(TABLE_NS, "table-row") {
            self.leave_text()?;
            self.state = State::InRow { had_cell: false };
        } else if name.is(TABLE_NS, "table-cell") {
            if let State::InRow { had_cell } = self.state {
                self.open_cell(had_cell, attributes)?;
            }
        } else if name.is(TEXT_NS, "p") {
            if let State::InCell { kind } = self.state {
                if kind == CellKind::Text {
                    self.out.quote()?;
                }
                self.state = State::InCellText { kind };
            }
        }
        Ok(())
    }

    fn end_element(&mut self, name: QualifiedName<'_>) -> Result<()> {
        if name.is(TABLE_NS, "table-row") {
            if self.state != State::Idle {
                self.leave_text()?;
                self.out.end_record()?;
                self.state = State::Idle;
            }
        } else if name.is(TABLE_NS, "table-cell") {
            if matches!(self.state, State::InCell { .. } | State::InCellText { .. }) {
                self.leave_text()?;
                self.state = State::InRow { had_cell: true };
            }
        } else if name.is(TEXT_NS, "p") {
            if let State::InCellText { kind } = self.state {
                self.leave_text()?;
                self.state = State::InCell { kind };
            }
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if self.state == (State::InCellText { kind: CellKind::Text }) {
            self.out.quoted_text(text)?;
        }
        Ok(())
    }

    fn warning(&mut self, issue: MarkupIssue) {
        tracing::debug!(%issue, "ignoring markup warning");
    }

    fn error(&mut self, issue: MarkupIssue) {
        self.record_error(issue);
    }

    fn fatal_error(&mut self, issue: MarkupIssue) {
        self.record_error(issue);
    }
}
