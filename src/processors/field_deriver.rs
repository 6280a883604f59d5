use crate::config::RowErrorPolicy;
use crate::error::{PipelineError, Result};
use crate::models::{
    Dataset, DerivedDataset, DerivedReading, Reading, RowRejection, Season, SeverityCategory,
    Variable,
};
use chrono::NaiveDate;

/// Build a Gregorian calendar date, failing on impossible triples.
///
/// Fields arrive as raw source integers, so negative or oversized values are
/// reported as `Date` errors rather than wrapped into range.
pub fn build_date(year: i64, month: i64, day: i64) -> Result<NaiveDate> {
    let error = || PipelineError::Date {
        row: 0,
        year,
        month,
        day,
    };

    let y = i32::try_from(year).map_err(|_| error())?;
    let m = u32::try_from(month).map_err(|_| error())?;
    let d = u32::try_from(day).map_err(|_| error())?;

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(error)
}

/// Adds `date`, `season` and `severity` to every reading.
///
/// Rows are checked in a fixed order: month, calendar date, then measurements.
/// Every present measurement must be finite, and PM2.5, RAIN and WSPM must also
/// be non-negative. The first violation decides the error.
pub struct FieldDeriver {
    policy: RowErrorPolicy,
}

impl FieldDeriver {
    pub fn new() -> Self {
        Self {
            policy: RowErrorPolicy::Skip,
        }
    }

    pub fn with_policy(policy: RowErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RowErrorPolicy {
        self.policy
    }

    /// Consume a raw dataset and produce its derived counterpart.
    ///
    /// Under [`RowErrorPolicy::Skip`] offending rows are dropped and listed in
    /// [`DerivedDataset::rejections`]; under [`RowErrorPolicy::Abort`] the first
    /// offending row fails the run.
    pub fn derive(&self, dataset: Dataset) -> Result<DerivedDataset> {
        let total = dataset.len();
        let mut rows = Vec::with_capacity(total);
        let mut rejections = Vec::new();

        for (index, reading) in dataset.into_readings().into_iter().enumerate() {
            let row = index + 1;
            let location = reading.location.clone();

            match derive_reading(reading) {
                Ok(derived) => rows.push(derived),
                Err(e) => {
                    let e = e.at_row(row);
                    if !e.is_row_level() {
                        return Err(e);
                    }
                    match self.policy {
                        RowErrorPolicy::Abort => return Err(e),
                        RowErrorPolicy::Skip => {
                            tracing::warn!(row, location = %location, "Skipping row: {}", e);
                            rejections.push(RowRejection {
                                row,
                                location,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        tracing::info!(
            total,
            derived = rows.len(),
            rejected = rejections.len(),
            "Derived date, season and severity fields"
        );

        Ok(DerivedDataset::new(rows, rejections))
    }
}

impl Default for FieldDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the fields of a single reading. Errors carry row 0.
pub fn derive_reading(reading: Reading) -> Result<DerivedReading> {
    let season = Season::from_month(reading.month)?;
    let date = build_date(reading.year, reading.month, reading.day)?;

    for variable in Variable::ALL {
        if let Some(value) = reading.value(variable) {
            if !value.is_finite() || (variable.is_non_negative() && value < 0.0) {
                return Err(PipelineError::InvalidMeasurement {
                    row: 0,
                    field: variable.column().to_string(),
                    value,
                });
            }
        }
    }

    let severity = SeverityCategory::from_pm25(reading.pm25)?;

    Ok(DerivedReading::new(reading, date, season, severity))
}
