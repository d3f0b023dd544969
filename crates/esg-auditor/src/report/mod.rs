//! Read-only views composed from the scoring engine, the carbon calculator
//! and the portfolio aggregators.

mod dashboard;
mod summary;
pub mod views;

pub use dashboard::{compose_dashboard, DashboardInputs};
pub use summary::{compose_report, ReportInputs, TOP_RISK_LIMIT};
pub use views::{
    ActionLine, CarbonSummary, DashboardView, DiagnosticStatus, KpiOverview, ReportView,
    SectionPercentage,
};
