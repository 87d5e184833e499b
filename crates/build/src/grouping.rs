//! Header suppression: a separator is written only when the source of the
//! next line differs from the previous one.

use std::io::{self, Write};

use crate::source::{OutputLine, Source};

/// Remembers the last source written.
#[derive(Debug, Default)]
pub struct Grouper {
    last: Option<Source>,
}

impl Grouper {
    /// Starts with no previous source, so the first line gets a header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the header to print before a line from `source`, if any.
    pub fn header_for(&mut self, source: &Source) -> Option<String> {
        if self.last.as_ref() == Some(source) {
            return None;
        }
        self.last = Some(source.clone());
        Some(source.header())
    }

    /// Writes `line`, preceded by a header on a source change.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_line<W: Write>(&mut self, out: &mut W, line: &OutputLine) -> io::Result<()> {
        if let Some(header) = self.header_for(&line.source) {
            writeln!(out, "{header}")?;
        }
        writeln!(out, "{}", line.text)
    }
}
