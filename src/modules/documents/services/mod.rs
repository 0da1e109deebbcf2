mod aggregator;
mod totals_service;

pub use aggregator::{recompute_and_store, recompute_totals, TaxableDocument};
pub use totals_service::TotalsService;
