// Quotations module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Quotation, QuotationResponse};
pub use services::QuotationService;
