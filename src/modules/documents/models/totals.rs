use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{format_amount, round_currency};
use crate::modules::documents::models::LineItem;
use crate::modules::taxes::services::compute_line_totals;

/// Summary columns cached on every invoice and quotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTotals {
    pub total_gst_amount: Decimal,
    pub total_amount_after_gst: Decimal,
    /// Sum of quantities, kept as display text
    pub total_units: String,
}

impl DocumentTotals {
    pub fn zero() -> Self {
        Self {
            total_gst_amount: Decimal::ZERO,
            total_amount_after_gst: Decimal::ZERO,
            total_units: "0".to_string(),
        }
    }

    /// Aggregates line items.
    ///
    /// Sums are taken over unrounded per-line amounts and rounded once at
    /// the end.
    pub fn from_line_items(items: &[LineItem]) -> Self {
        let mut gst = Decimal::ZERO;
        let mut after_gst = Decimal::ZERO;
        let mut units: i64 = 0;

        for item in items {
            let line = compute_line_totals(item);
            gst += line.total_tax;
            after_gst += line.post_tax_amount;
            units += i64::from(item.quantity);
        }

        Self {
            total_gst_amount: round_currency(gst),
            total_amount_after_gst: round_currency(after_gst),
            total_units: units.to_string(),
        }
    }

    /// Amount before GST, derived from the cached columns
    pub fn amount_before_gst(&self) -> Decimal {
        self.total_amount_after_gst - self.total_gst_amount
    }
}

impl Default for DocumentTotals {
    fn default() -> Self {
        Self::zero()
    }
}

/// Serialized form of [`DocumentTotals`]
#[derive(Debug, Clone, Serialize)]
pub struct DocumentTotalsResponse {
    pub total_gst_amount: String,
    pub total_amount_after_gst: String,
    pub total_units: String,
}

impl From<&DocumentTotals> for DocumentTotalsResponse {
    fn from(totals: &DocumentTotals) -> Self {
        Self {
            total_gst_amount: format_amount(totals.total_gst_amount),
            total_amount_after_gst: format_amount(totals.total_amount_after_gst),
            total_units: totals.total_units.clone(),
        }
    }
}
