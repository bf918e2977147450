//! Minimal header-indexed CSV reader for capacity tables.
//!
//! Capacity tables are small, comma-separated, with a single header line.
//! Columns are located by header name (case-insensitive, surrounding
//! whitespace ignored) so column order in the file does not matter.

use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};

/// Parsed CSV text: header names plus data records with their line numbers.
pub(crate) struct CsvText<'a> {
    source: &'a str,
    headers: Vec<&'a str>,
    records: Vec<(usize, Vec<&'a str>)>,
}

impl<'a> CsvText<'a> {
    /// Split `text` into header and records. `source` names the file in errors.
    pub(crate) fn parse(text: &'a str, source: &'a str) -> CalcResult<Self> {
        let mut lines = text.lines().enumerate();

        let header_line = lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .map(|(_, line)| line)
            .ok_or_else(|| CalcError::file_error("read", source, "CSV file is empty"))?;

        let headers: Vec<&str> = header_line
            .trim_start_matches('\u{feff}')
            .split(',')
            .map(str::trim)
            .collect();

        let records = lines
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| (i + 1, line.split(',').map(str::trim).collect()))
            .collect();

        Ok(CsvText {
            source,
            headers,
            records,
        })
    }

    /// Index of a required column
    pub(crate) fn column(&self, name: &str) -> CalcResult<usize> {
        self.optional_column(name).ok_or_else(|| {
            CalcError::file_error("parse", self.source, format!("Missing '{}' column", name))
        })
    }

    /// Index of an optional column
    pub(crate) fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Data records as `(line_number, fields)`
    pub(crate) fn records(&self) -> impl Iterator<Item = &(usize, Vec<&'a str>)> {
        self.records.iter()
    }

    /// Text cell at `idx`, an error if the record is too short or the cell blank
    pub(crate) fn text(&self, line: usize, fields: &[&'a str], idx: usize) -> CalcResult<&'a str> {
        match fields.get(idx) {
            Some(cell) if !cell.is_empty() => Ok(cell),
            _ => Err(CalcError::file_error(
                "parse",
                self.source,
                format!("Line {}: missing value in '{}' column", line, self.headers[idx]),
            )),
        }
    }

    /// Numeric cell at `idx`
    pub(crate) fn number(&self, line: usize, fields: &[&'a str], idx: usize) -> CalcResult<f64> {
        let cell = self.text(line, fields, idx)?;
        f64::from_str(cell).map_err(|_| {
            CalcError::file_error(
                "parse",
                self.source,
                format!("Line {}: '{}' is not a number in '{}' column", line, cell, self.headers[idx]),
            )
        })
    }

    /// Optional text cell; blank and `-` read as absent
    pub(crate) fn optional_text(&self, fields: &[&'a str], idx: Option<usize>) -> Option<&'a str> {
        idx.and_then(|i| fields.get(i))
            .copied()
            .filter(|cell| !cell.is_empty() && *cell != "-")
    }

    /// Wrap a cell-level parse error with file and line context
    pub(crate) fn cell_error(&self, line: usize, err: CalcError) -> CalcError {
        CalcError::file_error("parse", self.source, format!("Line {}: {}", line, err))
    }
}
