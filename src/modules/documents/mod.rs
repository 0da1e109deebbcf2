// Documents module: line items, totals and the document store shared by
// invoices and quotations

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{DocumentKind, DocumentTotals, LineItem};
pub use repositories::{DocumentStore, DocumentTransaction, MySqlDocumentStore};
pub use services::{recompute_totals, TaxableDocument, TotalsService};
