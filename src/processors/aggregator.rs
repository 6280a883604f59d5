use crate::error::{PipelineError, Result};
use crate::models::{DerivedReading, FilteredView, Season, SeverityCategory, Variable};
use crate::utils::constants::MIN_CORRELATION_OBSERVATIONS;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalMean {
    pub mean: f64,
    pub count: usize,
}

/// Mean PM2.5 per season. Seasons without a single PM2.5 value are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeasonalSummary {
    seasons: BTreeMap<Season, SeasonalMean>,
}

impl SeasonalSummary {
    pub fn mean(&self, season: Season) -> Option<f64> {
        self.seasons.get(&season).map(|s| s.mean)
    }

    pub fn get(&self, season: Season) -> Option<&SeasonalMean> {
        self.seasons.get(&season)
    }

    /// Entries in calendar order, winter first.
    pub fn iter(&self) -> impl Iterator<Item = (Season, &SeasonalMean)> {
        self.seasons.iter().map(|(season, mean)| (*season, mean))
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }
}

/// Group rows by season and average their PM2.5, skipping missing values.
pub fn seasonal_means(view: &FilteredView<'_>) -> SeasonalSummary {
    let mut sums: BTreeMap<Season, (f64, usize)> = BTreeMap::new();

    for row in view.iter() {
        if let Some(pm25) = row.pm25() {
            let entry = sums.entry(row.season()).or_insert((0.0, 0));
            entry.0 += pm25;
            entry.1 += 1;
        }
    }

    let seasons = sums
        .into_iter()
        .map(|(season, (sum, count))| {
            (
                season,
                SeasonalMean {
                    mean: sum / count as f64,
                    count,
                },
            )
        })
        .collect();

    SeasonalSummary { seasons }
}

/// A Pearson coefficient, or the explicit absence of one.
///
/// `Undefined` covers zero variance and too few paired observations; it
/// serializes as `null` and is never folded into 0.0 or NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined(r) => Some(*r),
            Correlation::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Correlation::Defined(_))
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Correlation::Defined(r) => serializer.serialize_some(r),
            Correlation::Undefined => serializer.serialize_none(),
        }
    }
}

const N: usize = Variable::ALL.len();

/// Symmetric PM2.5/weather correlation matrix over [`Variable::ALL`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    variables: [Variable; N],
    values: [[Correlation; N]; N],
}

impl CorrelationMatrix {
    fn undefined() -> Self {
        Self {
            variables: Variable::ALL,
            values: [[Correlation::Undefined; N]; N],
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn get(&self, first: Variable, second: Variable) -> Correlation {
        self.values[first.index()][second.index()]
    }

    /// Like [`get`](Self::get), but an undefined cell becomes an
    /// `UndefinedCorrelation` error for callers that need a number.
    pub fn require(&self, first: Variable, second: Variable) -> Result<f64> {
        self.get(first, second)
            .value()
            .ok_or_else(|| PipelineError::UndefinedCorrelation {
                first: first.to_string(),
                second: second.to_string(),
            })
    }

    pub fn row(&self, variable: Variable) -> &[Correlation; N] {
        &self.values[variable.index()]
    }

    /// Variables whose whole row and column is undefined.
    pub fn undefined_variables(&self) -> Vec<Variable> {
        self.variables
            .iter()
            .copied()
            .filter(|v| !self.get(*v, *v).is_defined())
            .collect()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().flatten().all(|c| !c.is_defined())
    }
}

/// Per-variable spread over every row where the variable is present.
fn has_spread(view: &FilteredView<'_>, variable: Variable) -> bool {
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in view.iter().filter_map(|row| row.reading().value(variable)) {
        count += 1;
        min = min.min(value);
        max = max.max(value);
    }

    count >= MIN_CORRELATION_OBSERVATIONS && min < max
}

/// Pearson correlation over rows where both variables are present.
fn pairwise_pearson(rows: &[&DerivedReading], first: Variable, second: Variable) -> Correlation {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|row| {
            let reading = row.reading();
            Some((reading.value(first)?, reading.value(second)?))
        })
        .collect();

    if pairs.len() < MIN_CORRELATION_OBSERVATIONS {
        return Correlation::Undefined;
    }

    let (x0, y0) = pairs[0];
    // Constant within this pair's rows even though each variable varies overall
    if pairs.iter().all(|&(x, _)| x == x0) || pairs.iter().all(|&(_, y)| y == y0) {
        return Correlation::Undefined;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x / n).sum::<f64>();
    let mean_y = pairs.iter().map(|(_, y)| y / n).sum::<f64>();

    // Pearson is scale invariant; dividing deviations by their largest
    // magnitude keeps the sums of squares finite for extreme inputs.
    let scale_x = pairs.iter().map(|(x, _)| (x - mean_x).abs()).fold(0.0, f64::max);
    let scale_y = pairs.iter().map(|(_, y)| (y - mean_y).abs()).fold(0.0, f64::max);
    if !(scale_x.is_finite() && scale_y.is_finite()) || scale_x == 0.0 || scale_y == 0.0 {
        return Correlation::Undefined;
    }

    let (mut sxx, mut syy, mut sxy) = (0.0f64, 0.0f64, 0.0f64);
    for &(x, y) in &pairs {
        let dx = (x - mean_x) / scale_x;
        let dy = (y - mean_y) / scale_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if !r.is_finite() {
        return Correlation::Undefined;
    }

    Correlation::Defined(r.clamp(-1.0, 1.0))
}

/// Correlate PM2.5 and the weather covariates, pairwise-complete per cell.
pub fn correlation_matrix(view: &FilteredView<'_>) -> CorrelationMatrix {
    let mut matrix = CorrelationMatrix::undefined();
    if view.is_empty() {
        return matrix;
    }

    let rows = view.to_vec();
    let spread: Vec<bool> = Variable::ALL.iter().map(|v| has_spread(view, *v)).collect();

    for (i, first) in Variable::ALL.iter().enumerate() {
        if !spread[i] {
            tracing::info!(variable = %first, "Correlation undefined: zero variance or too few values");
            continue;
        }

        matrix.values[i][i] = Correlation::Defined(1.0);

        for (j, second) in Variable::ALL.iter().enumerate().skip(i + 1) {
            if !spread[j] {
                continue;
            }
            let r = pairwise_pearson(&rows, *first, *second);
            matrix.values[i][j] = r;
            matrix.values[j][i] = r;
        }
    }

    matrix
}

/// Row counts per severity band; rows without PM2.5 are counted separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityDistribution {
    pub counts: BTreeMap<SeverityCategory, usize>,
    pub undefined: usize,
}

impl SeverityDistribution {
    pub fn count(&self, category: SeverityCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.undefined
    }
}

/// Every band is reported, with zero counts included, so charts keep a fixed axis.
pub fn severity_distribution(view: &FilteredView<'_>) -> SeverityDistribution {
    let mut counts: BTreeMap<SeverityCategory, usize> =
        SeverityCategory::ALL.iter().map(|c| (*c, 0)).collect();
    let mut undefined = 0;

    for row in view.iter() {
        match row.severity() {
            Some(category) => *counts.entry(category).or_insert(0) += 1,
            None => undefined += 1,
        }
    }

    SeverityDistribution { counts, undefined }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub pm25: f64,
}

/// Row-level (variable, PM2.5) pairs for rows where both are present.
pub fn scatter_pairs(view: &FilteredView<'_>, variable: Variable) -> Vec<ScatterPoint> {
    view.iter()
        .filter_map(|row| {
            Some(ScatterPoint {
                x: row.reading().value(variable)?,
                pm25: row.pm25()?,
            })
        })
        .collect()
}
