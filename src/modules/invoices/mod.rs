// Invoices module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Invoice, InvoiceResponse};
pub use services::{InvoiceService, InvoiceSettings};
