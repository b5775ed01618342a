use thiserror::Error;

/// Failures while reading the sales file. Any of these aborts the whole report.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: ORDERDATE {value:?} is not in dd/mm/yyyy format")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: {column} value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A single view could not be computed. The dashboard shows a placeholder
/// for that section and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("{view}: no records to aggregate")]
    EmptyRecordSet { view: &'static str },

    #[error("{view}: cannot encode chart rows: {message}")]
    Encode { view: &'static str, message: String },
}

/// Writing the dashboard page failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
