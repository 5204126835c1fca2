pub mod dataset;
pub mod filter;

pub use dataset::{DateSpan, Dataset, FilterOptions};
pub use filter::{apply_filters, FilterCriteria};
