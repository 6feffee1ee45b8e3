use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building or projecting tabular weather data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Column '{column}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{column}' already exists")]
    DuplicateColumn { column: String },
}

impl DatasetError {
    pub fn missing_column<S: Into<String>>(column: S) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// Generator settings that cannot produce a series.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("{days} days from epoch {epoch} runs past the last representable date")]
    HorizonOverflow { epoch: NaiveDate, days: u32 },
}
