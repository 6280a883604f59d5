use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PipelineError, Result};
use crate::utils::constants::{COL_PM25, SEVERITY_BOUNDS};

/// Air-quality severity band for a PM2.5 concentration.
///
/// Bands are closed on the right: `[0, 50]`, `(50, 100]`, `(100, 150]`,
/// `(150, 200]`, `(200, 300]`, `(300, inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityCategory {
    #[serde(rename = "Baik")]
    Baik,
    #[serde(rename = "Sedang")]
    Sedang,
    #[serde(rename = "Tidak Sehat (Sensitif)")]
    TidakSehatSensitif,
    #[serde(rename = "Tidak Sehat")]
    TidakSehat,
    #[serde(rename = "Sangat Tidak Sehat")]
    SangatTidakSehat,
    #[serde(rename = "Berbahaya")]
    Berbahaya,
}

impl SeverityCategory {
    pub const ALL: [SeverityCategory; 6] = [
        SeverityCategory::Baik,
        SeverityCategory::Sedang,
        SeverityCategory::TidakSehatSensitif,
        SeverityCategory::TidakSehat,
        SeverityCategory::SangatTidakSehat,
        SeverityCategory::Berbahaya,
    ];

    /// Categorize a PM2.5 value. Missing input gives `Ok(None)`; a negative or
    /// non-finite value is an `InvalidMeasurement`.
    pub fn from_pm25(pm25: Option<f64>) -> Result<Option<Self>> {
        let Some(value) = pm25 else {
            return Ok(None);
        };

        if !value.is_finite() || value < 0.0 {
            return Err(PipelineError::InvalidMeasurement {
                row: 0,
                field: COL_PM25.to_string(),
                value,
            });
        }

        let band = SEVERITY_BOUNDS
            .iter()
            .position(|&upper| value <= upper)
            .unwrap_or(SEVERITY_BOUNDS.len());

        Ok(Some(Self::ALL[band]))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityCategory::Baik => "Baik",
            SeverityCategory::Sedang => "Sedang",
            SeverityCategory::TidakSehatSensitif => "Tidak Sehat (Sensitif)",
            SeverityCategory::TidakSehat => "Tidak Sehat",
            SeverityCategory::SangatTidakSehat => "Sangat Tidak Sehat",
            SeverityCategory::Berbahaya => "Berbahaya",
        }
    }

    /// Concentration range covered by this band as (exclusive lower, inclusive upper).
    /// The lowest band also includes its lower bound of 0.
    pub fn bounds(&self) -> (f64, f64) {
        let idx = *self as usize;
        let lower = if idx == 0 { 0.0 } else { SEVERITY_BOUNDS[idx - 1] };
        let upper = SEVERITY_BOUNDS.get(idx).copied().unwrap_or(f64::INFINITY);
        (lower, upper)
    }
}

impl fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
