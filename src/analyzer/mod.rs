pub mod agents;
pub mod clients;
pub mod dashboard;
pub mod distribution;
pub mod grouping;
pub mod heatmap;
pub mod palette;
pub mod pareto;
pub mod stats;
pub mod temporal;

pub use dashboard::{build_dashboard, DashboardSnapshot};
pub use stats::{average, median, pct};
