pub mod api;
pub mod coordinator;
pub mod layout;
pub mod presentation;
pub mod ui;

pub use ui::OperationReportDashboard;
