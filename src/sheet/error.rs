use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("{results} results for {rows} rows")]
    LengthMismatch { rows: usize, results: usize },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for SheetError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}
