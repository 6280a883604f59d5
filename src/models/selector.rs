use serde::Serialize;
use std::fmt;

use crate::models::DerivedReading;

/// Which monitoring location to look at.
///
/// "All locations" is its own variant rather than a reserved string, so a
/// station genuinely named "All" is still selectable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LocationSelector {
    AllLocations,
    SpecificLocation(String),
}

impl LocationSelector {
    pub fn specific(name: impl Into<String>) -> Self {
        LocationSelector::SpecificLocation(name.into())
    }

    /// `None` selects every location.
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(name) => LocationSelector::SpecificLocation(name),
            None => LocationSelector::AllLocations,
        }
    }

    pub fn matches(&self, location: &str) -> bool {
        match self {
            LocationSelector::AllLocations => true,
            LocationSelector::SpecificLocation(name) => name == location,
        }
    }
}

impl fmt::Display for LocationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSelector::AllLocations => f.write_str("all locations"),
            LocationSelector::SpecificLocation(name) => f.write_str(name),
        }
    }
}

/// Read-only view over derived rows selected by a [`LocationSelector`].
///
/// The all-locations view borrows the base slice as is; a specific location
/// holds references to the matching rows in their original order.
#[derive(Debug, Clone)]
pub enum FilteredView<'a> {
    Whole(&'a [DerivedReading]),
    Subset(Vec<&'a DerivedReading>),
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        match self {
            FilteredView::Whole(rows) => rows.len(),
            FilteredView::Subset(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &'a DerivedReading> + '_> {
        match self {
            FilteredView::Whole(rows) => {
                let rows: &'a [DerivedReading] = *rows;
                Box::new(rows.iter())
            }
            FilteredView::Subset(rows) => Box::new(rows.iter().copied()),
        }
    }

    pub fn to_vec(&self) -> Vec<&'a DerivedReading> {
        self.iter().collect()
    }
}
