// Auto sales reporting: loads a sales export once, derives ten independent
// aggregate views from it and renders them as a single-page dashboard.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
pub mod render;
pub mod types;
pub mod util;
pub mod views;

pub use config::ReportConfig;
pub use dashboard::{build_dashboard, ReportViews, Section, SectionBody};
pub use error::{LoadError, OutputError, ViewError};
pub use loader::{load_records, LoadSummary};
pub use types::{RecordSet, SalesRecord};
