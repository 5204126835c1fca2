pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod state;
pub mod store;

pub use analyzer::{build_dashboard, DashboardSnapshot};
pub use config::AppConfig;
pub use error::AppError;
pub use parser::{parse_bytes, parse_csv, ParseOutput, Status, TicketRecord};
pub use state::AppState;
pub use store::{Dataset, FilterCriteria};

// ─── E2E Integration Tests ──────────────────────────────────────────────────
