use crate::models::{DerivedDataset, FilteredView, LocationSelector};

/// Narrow a derived dataset to one location without touching the base rows.
pub fn filter_by_location<'a>(
    dataset: &'a DerivedDataset,
    selector: &LocationSelector,
) -> FilteredView<'a> {
    let view = match selector {
        LocationSelector::AllLocations => FilteredView::Whole(dataset.rows()),
        LocationSelector::SpecificLocation(_) => FilteredView::Subset(
            dataset
                .rows()
                .iter()
                .filter(|row| selector.matches(row.location()))
                .collect(),
        ),
    };

    if view.is_empty() && !dataset.is_empty() {
        tracing::info!(%selector, "Location selection matched no rows");
    } else {
        tracing::debug!(%selector, rows = view.len(), "Filtered readings by location");
    }

    view
}
