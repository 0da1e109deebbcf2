mod report_controller;

pub use report_controller::{configure, MonthlyTaxQuery, PartySummaryQuery, ReportQuery};
