pub mod d402_operation_report;

pub use d402_operation_report::ui::OperationReportDashboard;
