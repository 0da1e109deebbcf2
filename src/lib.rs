//! gstbill: GST invoicing and reporting service.
//!
//! Invoices and quotations carry line items taxed under the Indian GST
//! components (CGST, SGST, IGST). Document totals are derived from the line
//! items and cached on the document; reports aggregate them per tenant over
//! financial-year windows.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use core::{AppError, Result};
pub use modules::documents;
pub use modules::invoices;
pub use modules::quotations;
pub use modules::reports;
pub use modules::taxes;
