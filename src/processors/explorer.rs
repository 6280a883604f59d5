use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{DerivedDataset, FilteredView, LocationSelector, Variable};
use crate::processors::aggregator::{
    correlation_matrix, scatter_pairs, seasonal_means, severity_distribution, CorrelationMatrix,
    ScatterPoint, SeasonalSummary, SeverityDistribution,
};
use crate::processors::{filter_by_location, FieldDeriver};
use crate::readers::RecordLoader;
use crate::utils::progress::ProgressReporter;
use std::path::Path;

/// Everything the display layer needs for one location selection.
#[derive(Debug, Clone)]
pub struct Exploration<'a> {
    pub selector: LocationSelector,
    pub view: FilteredView<'a>,
    pub seasonal: SeasonalSummary,
    pub severity: SeverityDistribution,
    pub correlation: CorrelationMatrix,
}

impl Exploration<'_> {
    pub fn scatter(&self, variable: Variable) -> Vec<ScatterPoint> {
        scatter_pairs(&self.view, variable)
    }
}

/// Owns the derived dataset and answers repeated location selections from it.
///
/// Loading and deriving happen once; every `explore` call builds a fresh
/// read-only view, so the base rows are never mutated.
pub struct Explorer {
    dataset: DerivedDataset,
}

impl Explorer {
    pub fn new(dataset: DerivedDataset) -> Self {
        Self { dataset }
    }

    /// Load a source and derive its fields according to `config`.
    pub fn from_path(
        path: &Path,
        config: &PipelineConfig,
        progress: Option<&ProgressReporter>,
    ) -> Result<Self> {
        let loader = RecordLoader::from_config(config)?;
        let raw = loader.load_path(path, progress)?;

        if let Some(p) = progress {
            p.set_message("Deriving fields...");
        }

        let dataset = FieldDeriver::with_policy(config.row_error_policy).derive(raw)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Prepared {} readings", dataset.len()));
        }

        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &DerivedDataset {
        &self.dataset
    }

    pub fn locations(&self) -> Vec<&str> {
        self.dataset.locations()
    }

    pub fn explore(&self, selector: &LocationSelector) -> Exploration<'_> {
        let view = filter_by_location(&self.dataset, selector);

        let exploration = Exploration {
            selector: selector.clone(),
            seasonal: seasonal_means(&view),
            severity: severity_distribution(&view),
            correlation: correlation_matrix(&view),
            view,
        };

        tracing::debug!(
            %selector,
            rows = exploration.view.len(),
            seasons = exploration.seasonal.len(),
            "Computed exploration"
        );

        exploration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, Reading, Season};

    fn explorer() -> Explorer {
        let readings = vec![
            Reading::new(2015, 1, 1, "Nongzhanguan").with_value(Variable::Pm25, Some(100.0)),
            Reading::new(2015, 7, 1, "Nongzhanguan").with_value(Variable::Pm25, Some(20.0)),
            Reading::new(2015, 1, 1, "Guanyuan").with_value(Variable::Pm25, Some(200.0)),
        ];
        Explorer::new(FieldDeriver::new().derive(Dataset::new(readings)).unwrap())
    }

    #[test]
    fn test_repeated_selections_share_base() {
        let explorer = explorer();

        let first = explorer.explore(&LocationSelector::specific("Guanyuan"));
        assert_eq!(first.seasonal.mean(Season::Winter), Some(200.0));
        assert_eq!(first.seasonal.mean(Season::Summer), None);

        let second = explorer.explore(&LocationSelector::specific("Nongzhanguan"));
        assert_eq!(second.seasonal.mean(Season::Winter), Some(100.0));
        assert_eq!(second.seasonal.mean(Season::Summer), Some(20.0));

        let everything = explorer.explore(&LocationSelector::AllLocations);
        assert_eq!(everything.view.len(), 3);
        assert_eq!(everything.seasonal.mean(Season::Winter), Some(150.0));
        assert_eq!(explorer.dataset().len(), 3);
    }

    #[test]
    fn test_locations() {
        assert_eq!(explorer().locations(), vec!["Nongzhanguan", "Guanyuan"]);
    }
}
