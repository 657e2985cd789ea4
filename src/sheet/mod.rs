//! Tabular input/output (CSV).
//!
//! The address column is read from a sheet with a header row; results are
//! appended as two extra columns and the whole sheet is written to a new file.

mod error;

pub use error::SheetError;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{error, info};

use crate::batch::{InputValue, VerificationResult};

pub const VALID_COLUMN: &str = "Is_Valid";
pub const MESSAGE_COLUMN: &str = "Validation_Message";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Builds a rectangular sheet. Rows wider than the header get unnamed
    /// extra columns, shorter rows get empty cells.
    pub fn new(mut headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .fold(headers.len(), usize::max);
        headers.resize(width, String::new());
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    /// Parses CSV with a header row, keeping only the rows whose `column`
    /// cell is non-blank. Returns the sheet and the addresses, row-aligned.
    pub fn from_reader<R: Read>(
        reader: R,
        column: &str,
    ) -> Result<(Self, Vec<InputValue>), SheetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let index = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
            .ok_or_else(|| SheetError::MissingColumn {
                column: column.to_string(),
                available: headers.clone(),
            })?;

        let mut rows = Vec::new();
        let mut emails = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let cell = record.get(index).unwrap_or_default().trim();
            if cell.is_empty() {
                continue;
            }
            emails.push(InputValue::Text(cell.to_string()));
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok((Self::new(headers, rows), emails))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fills `name` with `values`, replacing the column if it already exists.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), SheetError> {
        if values.len() != self.rows.len() {
            return Err(SheetError::LengthMismatch {
                rows: self.rows.len(),
                results: values.len(),
            });
        }
        let index = match self.headers.iter().position(|h| h == name) {
            Some(index) => index,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
        Ok(())
    }

    /// Appends the validity flag and diagnostic message columns.
    pub fn append_results(&mut self, results: &[VerificationResult]) -> Result<(), SheetError> {
        if results.len() != self.rows.len() {
            return Err(SheetError::LengthMismatch {
                rows: self.rows.len(),
                results: results.len(),
            });
        }
        self.set_column(
            VALID_COLUMN,
            results.iter().map(|r| r.is_valid.to_string()).collect(),
        )?;
        self.set_column(
            MESSAGE_COLUMN,
            results.iter().map(|r| r.message.clone()).collect(),
        )
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, SheetError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.into_inner().map_err(|err| SheetError::Csv {
            source: csv::Error::from(err.into_error()),
        })
    }
}

/// Reads `path` and extracts `column`. Failures are logged before being
/// returned.
pub fn read_sheet(path: &Path, column: &str) -> Result<(Sheet, Vec<InputValue>), SheetError> {
    let outcome = File::open(path)
        .map_err(|source| SheetError::Read {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|file| Sheet::from_reader(file, column));
    match &outcome {
        Ok((_, emails)) => info!(
            "Successfully read {} emails from {}",
            emails.len(),
            path.display()
        ),
        Err(err) => error!("Error reading {}: {err}", path.display()),
    }
    outcome
}

/// Writes the sheet atomically (temp file + rename). Failures are logged
/// before being returned.
pub fn write_sheet(path: &Path, sheet: &Sheet) -> Result<(), SheetError> {
    let outcome = sheet
        .to_csv_bytes()
        .and_then(|bytes| write_all_atomically(path, &bytes));
    match &outcome {
        Ok(()) => info!("Results written to {}", path.display()),
        Err(err) => error!("Error writing {}: {err}", path.display()),
    }
    outcome
}

fn write_all_atomically(path: &Path, bytes: &[u8]) -> Result<(), SheetError> {
    let write_err = |source| SheetError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    {
        let mut f = File::create(&tmp).map_err(write_err)?;
        f.write_all(bytes).map_err(write_err)?;
        f.sync_all().map_err(write_err)?;
    }
    std::fs::rename(&tmp, path).map_err(write_err)
}
