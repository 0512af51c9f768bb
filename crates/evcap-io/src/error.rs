//! Input table errors

use evcap_core::EvcapError;
use thiserror::Error;

/// Shape and content errors in an input table. All are raised before sizing.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{path}' is missing required column(s): {}", missing.join(", "))]
    MissingColumns { path: String, missing: Vec<String> },

    #[error("'{path}' line {line}: {message}")]
    BadRow {
        path: String,
        line: u64,
        message: String,
    },

    #[error("'{path}' line {line}: hour index {value} is not a non-negative integer")]
    InvalidHour { path: String, line: u64, value: f64 },

    #[error("'{path}' has {rows} data rows but the horizon needs {expected}")]
    TooFewRows {
        path: String,
        rows: usize,
        expected: usize,
    },

    #[error("'{path}' line {line}: hour {hour} appears more than once")]
    DuplicateHour { path: String, line: u64, hour: usize },

    #[error("'{path}' has no row for hour {hour}")]
    MissingHour { path: String, hour: usize },

    /// The tables load but do not form valid planning inputs
    #[error("invalid inputs: {0}")]
    Invalid(String),
}

impl From<EvcapError> for DataError {
    fn from(err: EvcapError) -> Self {
        DataError::Invalid(err.to_string())
    }
}

impl From<DataError> for EvcapError {
    fn from(err: DataError) -> Self {
        EvcapError::Data(err.to_string())
    }
}
