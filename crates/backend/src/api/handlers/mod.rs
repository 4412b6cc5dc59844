pub mod d402_operation_report;
pub mod health;
