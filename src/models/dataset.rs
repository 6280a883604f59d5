use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Reading, Season, SeverityCategory};

/// Raw readings as produced by the record loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl FromIterator<Reading> for Dataset {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A reading plus the fields computed from it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedReading {
    #[serde(flatten)]
    reading: Reading,
    date: NaiveDate,
    season: Season,
    severity: Option<SeverityCategory>,
}

impl DerivedReading {
    pub(crate) fn new(
        reading: Reading,
        date: NaiveDate,
        season: Season,
        severity: Option<SeverityCategory>,
    ) -> Self {
        Self {
            reading,
            date,
            season,
            severity,
        }
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn location(&self) -> &str {
        &self.reading.location
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// None when PM2.5 is missing for this row.
    pub fn severity(&self) -> Option<SeverityCategory> {
        self.severity
    }

    pub fn pm25(&self) -> Option<f64> {
        self.reading.pm25
    }
}

/// A row dropped by the field deriver, kept so the caller can report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    /// 1-based data row number in the source
    pub row: usize,
    pub location: String,
    pub reason: String,
}

/// Output of the field deriver: every surviving row with its derived fields.
///
/// The only way to obtain one is [`FieldDeriver::derive`](crate::processors::FieldDeriver::derive),
/// which consumes a raw [`Dataset`], so derived columns can never be appended twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedDataset {
    rows: Vec<DerivedReading>,
    rejections: Vec<RowRejection>,
}

impl DerivedDataset {
    pub(crate) fn new(rows: Vec<DerivedReading>, rejections: Vec<RowRejection>) -> Self {
        Self { rows, rejections }
    }

    pub fn rows(&self) -> &[DerivedReading] {
        &self.rows
    }

    pub fn rejections(&self) -> &[RowRejection] {
        &self.rejections
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct locations in order of first appearance.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(DerivedReading::location)
            .filter(|location| seen.insert(*location))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(location: &str, month: u32) -> DerivedReading {
        let reading = Reading::new(2014, month.into(), 1, location);
        DerivedReading::new(
            reading,
            NaiveDate::from_ymd_opt(2014, month, 1).unwrap(),
            Season::from_month(month.into()).unwrap(),
            None,
        )
    }

    #[test]
    fn test_locations_in_first_appearance_order() {
        let dataset = DerivedDataset::new(
            vec![
                derived("Wanliu", 1),
                derived("Dongsi", 2),
                derived("Wanliu", 3),
                derived("Tiantan", 4),
                derived("Dongsi", 5),
            ],
            Vec::new(),
        );

        assert_eq!(dataset.locations(), vec!["Wanliu", "Dongsi", "Tiantan"]);
    }

    #[test]
    fn test_raw_dataset_from_iter() {
        let dataset: Dataset = (1..=3).map(|m| Reading::new(2015, m, 1, "Gucheng")).collect();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.readings()[2].month, 3);
    }
}
