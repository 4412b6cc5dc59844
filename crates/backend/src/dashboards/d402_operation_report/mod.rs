pub mod service;

pub use service::{ReportSource, UpstreamClient, UpstreamError};
