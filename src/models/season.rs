use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PipelineError, Result};

/// Meteorological season, northern-hemisphere convention.
///
/// Declaration order is calendar order starting at winter, which is also the
/// order summaries are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// Map a month number (1-12) to its season.
    pub fn from_month(month: i64) -> Result<Self> {
        match month {
            12 | 1 | 2 => Ok(Season::Winter),
            3..=5 => Ok(Season::Spring),
            6..=8 => Ok(Season::Summer),
            9..=11 => Ok(Season::Autumn),
            _ => Err(PipelineError::InvalidMonth { row: 0, month }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }

    pub fn months(&self) -> [i64; 3] {
        match self {
            Season::Winter => [12, 1, 2],
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Autumn => [9, 10, 11],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_partition_into_seasons() {
        let mut hits = [0usize; 4];
        for month in 1..=12 {
            let season = Season::from_month(month).unwrap();
            hits[season as usize] += 1;
            assert!(season.months().contains(&month));
        }
        assert_eq!(hits, [3, 3, 3, 3]);
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(Season::from_month(12).unwrap(), Season::Winter);
        assert_eq!(Season::from_month(2).unwrap(), Season::Winter);
        assert_eq!(Season::from_month(3).unwrap(), Season::Spring);
        assert_eq!(Season::from_month(6).unwrap(), Season::Summer);
        assert_eq!(Season::from_month(9).unwrap(), Season::Autumn);
        assert_eq!(Season::from_month(11).unwrap(), Season::Autumn);
    }

    #[test]
    fn test_invalid_month() {
        for month in [-1, 0, 13, 99] {
            match Season::from_month(month) {
                Err(PipelineError::InvalidMonth { month: m, .. }) => assert_eq!(m, month),
                other => panic!("expected InvalidMonth, got {:?}", other),
            }
        }
    }
}
