// Property-based tests for per-line GST computation.
//
// Component amounts add up to the line tax, the line total is the pre-tax
// amount plus tax, and tax is linear in quantity.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gstbill::taxes::models::GstRates;
use gstbill::taxes::services::TaxCalculator;

fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))
}

fn price() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

proptest! {
    #[test]
    fn test_components_add_up_to_line_tax(
        quantity in 1i32..10_000,
        unit_price in price(),
        cgst in rate(),
        sgst in rate(),
        igst in rate(),
    ) {
        let rates = GstRates::new(cgst, sgst, igst);
        let totals = TaxCalculator::new().line_totals(quantity, unit_price, &rates);

        prop_assert_eq!(totals.cgst_amount + totals.sgst_amount + totals.igst_amount, totals.total_tax);
        prop_assert_eq!(totals.pre_tax_amount + totals.total_tax, totals.post_tax_amount);
    }

    #[test]
    fn test_tax_is_linear_in_quantity(
        first in 1i32..5_000,
        second in 1i32..5_000,
        unit_price in price(),
        cgst in rate(),
        sgst in rate(),
    ) {
        let calculator = TaxCalculator::new();
        let rates = GstRates::new(cgst, sgst, Decimal::ZERO);

        let combined = calculator.total_tax(first + second, unit_price, &rates);
        let split = calculator.total_tax(first, unit_price, &rates)
            + calculator.total_tax(second, unit_price, &rates);

        prop_assert_eq!(combined, split);
    }

    #[test]
    fn test_tax_is_non_negative_and_bounded(
        quantity in 1i32..10_000,
        unit_price in price(),
        igst in rate(),
    ) {
        let rates = GstRates::new(Decimal::ZERO, Decimal::ZERO, igst);
        let totals = TaxCalculator::new().line_totals(quantity, unit_price, &rates);

        prop_assert!(totals.total_tax >= Decimal::ZERO);
        prop_assert!(totals.total_tax <= totals.pre_tax_amount);
    }
}

#[test]
fn test_intra_state_example() {
    let rates = GstRates::new(dec!(9), dec!(9), dec!(0));
    let totals = TaxCalculator::new().line_totals(10, dec!(50.00), &rates);

    assert_eq!(totals.pre_tax_amount, dec!(500));
    assert_eq!(totals.cgst_amount, dec!(45));
    assert_eq!(totals.sgst_amount, dec!(45));
    assert_eq!(totals.total_tax, dec!(90));
    assert_eq!(totals.post_tax_amount, dec!(590));
}

#[test]
fn test_inter_state_example() {
    let rates = GstRates::new(dec!(0), dec!(0), dec!(18));
    let totals = TaxCalculator::new().line_totals(2, dec!(250.00), &rates);

    assert_eq!(totals.igst_amount, dec!(90));
    assert_eq!(totals.cgst_amount, dec!(0));
    assert_eq!(totals.post_tax_amount, dec!(590));
}

#[test]
fn test_zero_rated_line() {
    let totals = TaxCalculator::new().line_totals(4, dec!(12.50), &GstRates::default());

    assert_eq!(totals.total_tax, Decimal::ZERO);
    assert_eq!(totals.post_tax_amount, dec!(50.00));
}

#[test]
fn test_rate_validation() {
    assert!(GstRates::new(dec!(9), dec!(9), dec!(0)).validate().is_ok());
    assert!(GstRates::new(dec!(0), dec!(0), dec!(100)).validate().is_ok());
    assert!(GstRates::new(dec!(100.01), dec!(0), dec!(0)).validate().is_err());
    assert!(GstRates::new(dec!(-1), dec!(0), dec!(0)).validate().is_err());
    assert!(GstRates::new(dec!(2.505), dec!(0), dec!(0)).validate().is_err());
}
