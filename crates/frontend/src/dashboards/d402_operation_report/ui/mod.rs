pub mod dashboard;
pub mod report_table;
pub mod resize;

pub use dashboard::OperationReportDashboard;
pub use report_table::ReportTable;
