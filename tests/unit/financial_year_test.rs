// Financial year windows and report date parsing.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use gstbill::core::financial_year::month_label;
use gstbill::core::{financial_year_start, AppError, FinancialYear, ReportingClock};
use gstbill::reports::models::DateRange;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

proptest! {
    #[test]
    fn test_start_is_latest_april_first(days in 0i64..40_000) {
        let today = date(1990, 1, 1) + Duration::days(days);
        let start = financial_year_start(today);

        prop_assert_eq!((start.month(), start.day()), (4, 1));
        prop_assert!(start <= today);
        prop_assert!((today - start).num_days() < 366);
        prop_assert_eq!(financial_year_start(start), start);
    }
}

#[test]
fn test_boundaries() {
    assert_eq!(financial_year_start(date(2025, 4, 1)), date(2025, 4, 1));
    assert_eq!(financial_year_start(date(2025, 3, 31)), date(2024, 4, 1));
    assert_eq!(financial_year_start(date(2024, 12, 31)), date(2024, 4, 1));
}

#[test]
fn test_default_report_window_is_financial_year_to_date() {
    let today = date(2026, 2, 14);
    let window = DateRange::or_financial_year(None, today);

    assert_eq!(window.start, date(2025, 4, 1));
    assert_eq!(window.end, today);

    let fy = FinancialYear::to_date(today);
    assert_eq!((fy.start, fy.end), (window.start, window.end));
}

#[test]
fn test_explicit_range_wins_over_financial_year() {
    let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
    assert_eq!(DateRange::or_financial_year(Some(range), date(2026, 2, 14)), range);
}

#[test]
fn test_calendar_month_ranges() {
    let feb = DateRange::calendar_month(2024, 2).unwrap();
    assert_eq!(feb.start, date(2024, 2, 1));
    assert_eq!(feb.end, date(2024, 2, 29));

    let dec = DateRange::calendar_month(2025, 12).unwrap();
    assert_eq!(dec.end, date(2025, 12, 31));

    assert!(matches!(DateRange::calendar_month(2025, 13), Err(AppError::Validation(_))));
    assert!(matches!(DateRange::calendar_month(2025, 0), Err(AppError::Validation(_))));
}

#[test]
fn test_date_params_must_come_in_pairs() {
    assert_eq!(DateRange::from_params(None, None).unwrap(), None);
    assert!(DateRange::from_params(Some("2025-04-01"), None).is_err());
    assert!(DateRange::from_params(None, Some("2025-04-30")).is_err());
    assert!(DateRange::from_params(Some("2025-05-01"), Some("2025-04-30")).is_err());

    let range = DateRange::from_params(Some("2025-04-01"), Some("2025-04-30"))
        .unwrap()
        .unwrap();
    assert!(range.contains(date(2025, 4, 15)));
    assert!(!range.contains(date(2025, 5, 1)));
}

#[test]
fn test_month_labels() {
    let labels: Vec<_> = (1..=12).filter_map(month_label).collect();
    assert_eq!(labels.len(), 12);
    assert_eq!(labels[0], "Jan");
    assert_eq!(labels[3], "Apr");
    assert_eq!(month_label(13), None);
}

#[test]
fn test_reporting_clock_uses_local_date() {
    let ist = ReportingClock::from_offset_minutes(330).unwrap();
    let utc = ReportingClock::from_offset_minutes(0).unwrap();
    let instant = Utc.with_ymd_and_hms(2025, 3, 31, 19, 0, 0).unwrap();

    assert_eq!(ist.date_at(instant), date(2025, 4, 1));
    assert_eq!(utc.date_at(instant), date(2025, 3, 31));
    assert_eq!(financial_year_start(ist.date_at(instant)), date(2025, 4, 1));
}
