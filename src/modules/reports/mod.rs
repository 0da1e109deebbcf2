// Reports module: dashboard widgets, monthly tax report and party summaries

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use repositories::{MySqlReportRepository, ReportRepository};
pub use services::ReportService;
