use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Data source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Row {row}: invalid value '{value}' in column {column}")]
    InvalidFormat {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: {year}-{month}-{day} is not a valid calendar date")]
    Date {
        row: usize,
        year: i64,
        month: i64,
        day: i64,
    },

    #[error("Row {row}: month {month} is outside 1-12")]
    InvalidMonth { row: usize, month: i64 },

    #[error("Row {row}: {field} must be a finite, physically valid value, got {value}")]
    InvalidMeasurement {
        row: usize,
        field: String,
        value: f64,
    },

    #[error("Correlation between {first} and {second} is undefined (zero variance or too few observations)")]
    UndefinedCorrelation { first: String, second: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Attach a 1-based data row number to a row-level error.
    ///
    /// Field helpers such as [`Season::from_month`](crate::models::Season::from_month)
    /// are row-agnostic and report row 0; the deriver fills in the real row.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            PipelineError::Date {
                year, month, day, ..
            } => PipelineError::Date {
                row,
                year,
                month,
                day,
            },
            PipelineError::InvalidMonth { month, .. } => PipelineError::InvalidMonth { row, month },
            PipelineError::InvalidMeasurement { field, value, .. } => {
                PipelineError::InvalidMeasurement { row, field, value }
            }
            other => other,
        }
    }

    /// Row-level contract violations raised while deriving fields.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            PipelineError::Date { .. }
                | PipelineError::InvalidMonth { .. }
                | PipelineError::InvalidMeasurement { .. }
        )
    }
}
