//! CSV reading: header row plus data rows as string-keyed maps.

use std::collections::HashMap;
use std::io::Read;

use crate::error::CsvImportError;

/// One data row, keyed by header name, with its 1-based position in the
/// file's data section for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data-row number (the header row is not counted).
    pub index: usize,
    pub values: HashMap<String, String>,
}

impl RawRow {
    /// Returns the trimmed value for `column`, or `None` when the column is
    /// absent or blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// A parsed file: ordered header names plus all data rows.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Reads a whole CSV file from `input`.
///
/// The header row is required. Short rows are padded with empty fields and
/// long rows are truncated to the header width, matching how spreadsheet
/// exports pad trailing blanks inconsistently.
///
/// # Errors
///
/// - [`CsvImportError::MissingHeader`] if the file is empty.
/// - [`CsvImportError::Empty`] if there is a header but zero data rows.
/// - [`CsvImportError::Csv`] on malformed CSV input.
pub fn read_csv<R: Read>(input: R) -> Result<ParsedCsv, CsvImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = match reader.headers() {
        Ok(record) if !record.is_empty() => record.iter().map(ToString::to_string).collect(),
        Ok(_) => return Err(CsvImportError::MissingHeader),
        Err(e) => {
            // The csv crate reports a fully empty input as an I/O-level
            // error on the header read; surface it as a missing header.
            if e.is_io_error() {
                return Err(CsvImportError::MissingHeader);
            }
            return Err(e.into());
        }
    };

    let mut rows = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        let values: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                (
                    header.clone(),
                    record.get(i).unwrap_or_default().to_string(),
                )
            })
            .collect();
        rows.push(RawRow {
            index: offset + 1,
            values,
        });
    }

    if rows.is_empty() {
        return Err(CsvImportError::Empty);
    }

    Ok(ParsedCsv { headers, rows })
}
