mod report_service;

pub use report_service::{ReportService, TOP_CLIENT_LIMIT};
