use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::models::{Dataset, Reading, Variable};
use crate::utils::constants::{
    COL_DAY, COL_LOCATION, COL_MONTH, COL_YEAR, DEFAULT_DELIMITER, DEFAULT_MISSING_MARKERS,
    REQUIRED_COLUMNS,
};
use crate::utils::progress::ProgressReporter;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PROGRESS_CHUNK: usize = 10_000;

/// Column positions of the required fields within a source header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    year: usize,
    month: usize,
    day: usize,
    location: usize,
    variables: [usize; 6],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::Schema { missing });
        }

        let position = |name: &str| {
            find(name).ok_or_else(|| PipelineError::Schema {
                missing: vec![name.to_string()],
            })
        };

        let mut variables = [0usize; 6];
        for variable in Variable::ALL {
            variables[variable.index()] = position(variable.column())?;
        }

        Ok(Self {
            year: position(COL_YEAR)?,
            month: position(COL_MONTH)?,
            day: position(COL_DAY)?,
            location: position(COL_LOCATION)?,
            variables,
        })
    }
}

/// Reads tabular sensor data into a [`Dataset`].
///
/// Extra columns in the source are ignored. Only the ten required columns are
/// looked at, by header name.
pub struct RecordLoader {
    delimiter: u8,
    missing_markers: Vec<String>,
}

impl RecordLoader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            missing_markers: config.missing_markers.clone(),
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a dataset from a file. The file handle is released on every exit path.
    pub fn load_path(&self, path: &Path, progress: Option<&ProgressReporter>) -> Result<Dataset> {
        let file = File::open(path).map_err(|source| PipelineError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loading sensor readings");
        let dataset = self.load_reader(file, progress)?;
        tracing::info!(rows = dataset.len(), "Loaded sensor readings");

        Ok(dataset)
    }

    /// Load a dataset from any reader producing delimited text with a header row.
    pub fn load_reader<R: Read>(
        &self,
        reader: R,
        progress: Option<&ProgressReporter>,
    ) -> Result<Dataset> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;
        let mut readings = Vec::new();

        for (index, record_result) in csv_reader.records().enumerate() {
            let record = record_result?;
            readings.push(self.parse_record(&record, &columns, index + 1)?);

            if (index + 1) % PROGRESS_CHUNK == 0 {
                if let Some(p) = progress {
                    p.increment(PROGRESS_CHUNK as u64);
                }
            }
        }

        if let Some(p) = progress {
            p.increment((readings.len() % PROGRESS_CHUNK) as u64);
        }

        Ok(Dataset::new(readings))
    }

    /// Parse a single data row; `row` is the 1-based data row number.
    ///
    /// Calendar fields are kept as raw integers. Range checks belong to the
    /// field deriver, where they fall under the row error policy.
    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &ColumnIndex,
        row: usize,
    ) -> Result<Reading> {
        let year = parse_integer(cell(record, columns.year), COL_YEAR, row)?;
        let month = parse_integer(cell(record, columns.month), COL_MONTH, row)?;
        let day = parse_integer(cell(record, columns.day), COL_DAY, row)?;

        let location = cell(record, columns.location);
        if location.is_empty() {
            return Err(invalid(COL_LOCATION, location, row));
        }

        let mut reading = Reading::new(year, month, day, location);
        for variable in Variable::ALL {
            let raw = cell(record, columns.variables[variable.index()]);
            let value = self.parse_measurement(raw, variable, row)?;
            reading = reading.with_value(variable, value);
        }

        Ok(reading)
    }

    fn parse_measurement(&self, raw: &str, variable: Variable, row: usize) -> Result<Option<f64>> {
        if self.is_missing(raw) {
            return Ok(None);
        }

        let value = raw
            .parse::<f64>()
            .map_err(|_| invalid(variable.column(), raw, row))?;

        if value.is_nan() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    fn is_missing(&self, raw: &str) -> bool {
        self.missing_markers.iter().any(|marker| marker == raw)
    }
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

/// Calendar fields are integers, but exports often write them as `2013.0`.
///
/// Integral floats outside the `i64` range are rejected rather than saturated.
fn parse_integer(raw: &str, column: &str, row: usize) -> Result<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }

    // 2^63; every integral f64 strictly inside (-2^63, 2^63) fits in i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < LIMIT => {
            Ok(value as i64)
        }
        _ => Err(invalid(column, raw, row)),
    }
}

fn invalid(column: &str, value: &str, row: usize) -> PipelineError {
    PipelineError::InvalidFormat {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}
