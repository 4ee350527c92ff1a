pub mod audit_log;
pub mod config;
pub mod engine;
pub mod listing;
pub mod registry;
pub mod report;
pub mod store;

pub use audit_log::AuditLog;
pub use config::Config;
pub use engine::{Admission, Engine, Release};
pub use listing::{render_plans_table, sort_plans, ListOrder};
pub use registry::Registry;
pub use report::{
    period_report, render_report, render_status, status_snapshot, write_report, PeriodReport,
    QueueSummary, ReasonCount, RunwaySummary, StatusSnapshot,
};
pub use store::QueueStore;
