use rust_decimal::Decimal;

use crate::core::money::MAX_AMOUNT;
use crate::core::{AppError, Result};
use crate::modules::documents::models::LineItem;
use crate::modules::taxes::models::{GstRates, LineTotals};

/// Computes GST amounts for a single line item.
///
/// Every component is `rate / 100 × unit_price × quantity`. The plain
/// methods assume inputs already passed [`validate_line_amounts`];
/// [`TaxCalculator::checked_line_totals`] is safe on raw input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculator;

impl TaxCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `unit_price × quantity`
    pub fn pre_tax_amount(&self, quantity: i32, unit_price: Decimal) -> Decimal {
        unit_price * Decimal::from(quantity)
    }

    /// Tax for one GST component
    pub fn component_tax(&self, rate: Decimal, quantity: i32, unit_price: Decimal) -> Decimal {
        rate / Decimal::ONE_HUNDRED * self.pre_tax_amount(quantity, unit_price)
    }

    /// `(cgst + sgst + igst) / 100 × unit_price × quantity`
    pub fn total_tax(&self, quantity: i32, unit_price: Decimal, rates: &GstRates) -> Decimal {
        self.component_tax(rates.total_rate(), quantity, unit_price)
    }

    pub fn line_totals(&self, quantity: i32, unit_price: Decimal, rates: &GstRates) -> LineTotals {
        let pre_tax_amount = self.pre_tax_amount(quantity, unit_price);
        let total_tax = self.total_tax(quantity, unit_price, rates);

        LineTotals {
            pre_tax_amount,
            cgst_amount: self.component_tax(rates.cgst, quantity, unit_price),
            sgst_amount: self.component_tax(rates.sgst, quantity, unit_price),
            igst_amount: self.component_tax(rates.igst, quantity, unit_price),
            total_tax,
            post_tax_amount: pre_tax_amount + total_tax,
        }
    }

    /// [`TaxCalculator::line_totals`] without panicking, None on overflow
    pub fn checked_line_totals(
        &self,
        quantity: i32,
        unit_price: Decimal,
        rates: &GstRates,
    ) -> Option<LineTotals> {
        let pre_tax_amount = unit_price.checked_mul(Decimal::from(quantity))?;
        let component = |rate: Decimal| {
            (rate / Decimal::ONE_HUNDRED).checked_mul(pre_tax_amount)
        };

        let total_tax = component(rates.total_rate())?;

        Some(LineTotals {
            pre_tax_amount,
            cgst_amount: component(rates.cgst)?,
            sgst_amount: component(rates.sgst)?,
            igst_amount: component(rates.igst)?,
            total_tax,
            post_tax_amount: pre_tax_amount.checked_add(total_tax)?,
        })
    }
}

/// Rejects a line whose amount after GST does not fit a money column.
///
/// Expects quantity, price and rates to be individually valid.
pub fn validate_line_amounts(
    quantity: i32,
    unit_price: Decimal,
    rates: &GstRates,
) -> Result<LineTotals> {
    TaxCalculator::new()
        .checked_line_totals(quantity, unit_price, rates)
        .filter(|totals| totals.post_tax_amount.abs() <= MAX_AMOUNT)
        .ok_or_else(|| {
            AppError::validation(format!(
                "Line amount after GST cannot exceed {} ({} × {} at {}%)",
                MAX_AMOUNT,
                quantity,
                unit_price,
                rates.total_rate()
            ))
        })
}

/// Unrounded tax breakdown of a stored line item
pub fn compute_line_totals(item: &LineItem) -> LineTotals {
    TaxCalculator::new().line_totals(item.quantity, item.unit_price, &item.rates)
}
