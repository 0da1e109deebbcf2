// Taxes module: GST rates and the per-line calculator

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{GstRates, LineTotals};
pub use services::{compute_line_totals, TaxCalculator};
