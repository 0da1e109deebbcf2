mod tax_calculator;

pub use tax_calculator::{compute_line_totals, validate_line_amounts, TaxCalculator};
