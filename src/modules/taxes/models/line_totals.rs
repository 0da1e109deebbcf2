use rust_decimal::Decimal;

use crate::core::round_currency;

/// Per-line tax breakdown.
///
/// Values are kept unrounded so that document totals can be summed without
/// compounding rounding error; call [`LineTotals::rounded`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineTotals {
    pub pre_tax_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub igst_amount: Decimal,
    pub total_tax: Decimal,
    pub post_tax_amount: Decimal,
}

impl LineTotals {
    /// Every amount rounded to currency scale
    pub fn rounded(&self) -> Self {
        Self {
            pre_tax_amount: round_currency(self.pre_tax_amount),
            cgst_amount: round_currency(self.cgst_amount),
            sgst_amount: round_currency(self.sgst_amount),
            igst_amount: round_currency(self.igst_amount),
            total_tax: round_currency(self.total_tax),
            post_tax_amount: round_currency(self.post_tax_amount),
        }
    }
}
