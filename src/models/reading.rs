use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;
use crate::utils::constants::{COL_DEWP, COL_PM25, COL_PRES, COL_RAIN, COL_TEMP, COL_WSPM};

/// One location-tagged sensor observation as read from the source.
///
/// The calendar triple is kept raw here; it is only turned into a date by the
/// field deriver, which is where invalid triples are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    // Raw calendar fields; range checks happen in the field deriver
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub location: String,

    // Measurements; None when the source cell is missing
    pub pm25: Option<f64>,
    pub temp: Option<f64>,
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub rain: Option<f64>,
    pub wspm: Option<f64>,
}

impl Reading {
    pub fn new(year: i64, month: i64, day: i64, location: impl Into<String>) -> Self {
        Self {
            year,
            month,
            day,
            location: location.into(),
            pm25: None,
            temp: None,
            pres: None,
            dewp: None,
            rain: None,
            wspm: None,
        }
    }

    pub fn with_value(mut self, variable: Variable, value: Option<f64>) -> Self {
        *self.slot_mut(variable) = value;
        self
    }

    pub fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Pm25 => self.pm25,
            Variable::Temp => self.temp,
            Variable::Pres => self.pres,
            Variable::Dewp => self.dewp,
            Variable::Rain => self.rain,
            Variable::Wspm => self.wspm,
        }
    }

    fn slot_mut(&mut self, variable: Variable) -> &mut Option<f64> {
        match variable {
            Variable::Pm25 => &mut self.pm25,
            Variable::Temp => &mut self.temp,
            Variable::Pres => &mut self.pres,
            Variable::Dewp => &mut self.dewp,
            Variable::Rain => &mut self.rain,
            Variable::Wspm => &mut self.wspm,
        }
    }
}

/// Numeric variables taking part in correlation and scatter analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "DEWP")]
    Dewp,
    #[serde(rename = "RAIN")]
    Rain,
    #[serde(rename = "WSPM")]
    Wspm,
}

impl Variable {
    /// Correlation matrix order: pollutant first, then the weather covariates.
    pub const ALL: [Variable; 6] = [
        Variable::Pm25,
        Variable::Temp,
        Variable::Pres,
        Variable::Dewp,
        Variable::Rain,
        Variable::Wspm,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Variable::Pm25 => COL_PM25,
            Variable::Temp => COL_TEMP,
            Variable::Pres => COL_PRES,
            Variable::Dewp => COL_DEWP,
            Variable::Rain => COL_RAIN,
            Variable::Wspm => COL_WSPM,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Variable::Pm25 => 0,
            Variable::Temp => 1,
            Variable::Pres => 2,
            Variable::Dewp => 3,
            Variable::Rain => 4,
            Variable::Wspm => 5,
        }
    }

    /// Quantities that cannot physically be negative.
    pub fn is_non_negative(&self) -> bool {
        matches!(self, Variable::Pm25 | Variable::Rain | Variable::Wspm)
    }

    pub fn is_weather(&self) -> bool {
        !matches!(self, Variable::Pm25)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Variable {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PipelineError::InvalidConfig(format!("Unknown variable: '{}'", s)))
    }
}
