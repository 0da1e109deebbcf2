// Document aggregation over line items.
//
// Totals are summed over unrounded line amounts and rounded once.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gstbill::core::round_currency;
use gstbill::documents::models::{DocumentTotals, LineItem};
use gstbill::taxes::models::GstRates;
use gstbill::taxes::services::compute_line_totals;

fn item(quantity: i32, unit_price: Decimal, rates: GstRates) -> LineItem {
    LineItem::new("Item", quantity, unit_price, rates).unwrap()
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (1i32..1_000, 1i64..10_000_000, 0i64..=2_800, 0i64..=2_800).prop_map(
        |(quantity, paise, cgst_bp, igst_bp)| {
            item(
                quantity,
                Decimal::new(paise, 2),
                GstRates::new(Decimal::new(cgst_bp, 2), Decimal::new(cgst_bp, 2), Decimal::new(igst_bp, 2)),
            )
        },
    )
}

#[test]
fn test_no_line_items_gives_zero_totals() {
    let totals = DocumentTotals::from_line_items(&[]);

    assert_eq!(totals, DocumentTotals::zero());
    assert_eq!(totals.total_gst_amount, Decimal::ZERO);
    assert_eq!(totals.total_amount_after_gst, Decimal::ZERO);
    assert_eq!(totals.total_units, "0");
}

#[test]
fn test_rounds_once_after_summing() {
    let rates = GstRates::new(dec!(0), dec!(0), dec!(5));
    let items = vec![
        item(3, dec!(0.35), rates),
        item(3, dec!(0.35), rates),
        item(3, dec!(0.35), rates),
    ];

    let totals = DocumentTotals::from_line_items(&items);

    // Per-line rounding would give 0.15 and 3.30
    assert_eq!(totals.total_gst_amount, dec!(0.16));
    assert_eq!(totals.total_amount_after_gst, dec!(3.31));
    assert_eq!(totals.total_units, "9");
}

#[test]
fn test_single_intra_state_line() {
    let items = vec![item(10, dec!(50.00), GstRates::new(dec!(9), dec!(9), dec!(0)))];
    let totals = DocumentTotals::from_line_items(&items);

    assert_eq!(totals.total_gst_amount, dec!(90.00));
    assert_eq!(totals.total_amount_after_gst, dec!(590.00));
    assert_eq!(totals.amount_before_gst(), dec!(500.00));
    assert_eq!(totals.total_units, "10");
}

proptest! {
    #[test]
    fn test_totals_match_rounded_line_sums(items in prop::collection::vec(line_item(), 0..12)) {
        let totals = DocumentTotals::from_line_items(&items);

        let gst: Decimal = items.iter().map(|i| compute_line_totals(i).total_tax).sum();
        let after: Decimal = items.iter().map(|i| compute_line_totals(i).post_tax_amount).sum();
        let units: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();

        prop_assert_eq!(totals.total_gst_amount, round_currency(gst));
        prop_assert_eq!(totals.total_amount_after_gst, round_currency(after));
        prop_assert_eq!(totals.total_units, units.to_string());
    }

    #[test]
    fn test_totals_ignore_line_order(items in prop::collection::vec(line_item(), 0..12)) {
        let mut reversed = items.clone();
        reversed.reverse();

        prop_assert_eq!(
            DocumentTotals::from_line_items(&items),
            DocumentTotals::from_line_items(&reversed)
        );
    }

    #[test]
    fn test_recomputing_is_idempotent(items in prop::collection::vec(line_item(), 0..12)) {
        let first = DocumentTotals::from_line_items(&items);
        let second = DocumentTotals::from_line_items(&items);
        prop_assert_eq!(first, second);
    }
}
