pub mod aggregator;
pub mod explorer;
pub mod field_deriver;
pub mod location_filter;

pub use aggregator::{
    correlation_matrix, scatter_pairs, seasonal_means, severity_distribution, Correlation,
    CorrelationMatrix, ScatterPoint, SeasonalMean, SeasonalSummary, SeverityDistribution,
};
pub use explorer::{Exploration, Explorer};
pub use field_deriver::{build_date, derive_reading, FieldDeriver};
pub use location_filter::filter_by_location;
