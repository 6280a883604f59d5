pub mod dataset;
pub mod reading;
pub mod season;
pub mod selector;
pub mod severity;

pub use dataset::{Dataset, DerivedDataset, DerivedReading, RowRejection};
pub use reading::{Reading, Variable};
pub use season::Season;
pub use selector::{FilteredView, LocationSelector};
pub use severity::SeverityCategory;
