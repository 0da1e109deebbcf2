use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

/// Month (1-based) on which the Indian financial year starts
pub const FINANCIAL_YEAR_START_MONTH: u32 = 4;

/// Three-letter labels for calendar months 1-12
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Inclusive date window used by financial-year reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialYear {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FinancialYear {
    /// Window from the start of the financial year containing `today` up to `today`
    pub fn to_date(today: NaiveDate) -> Self {
        Self {
            start: financial_year_start(today),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// First day of the financial year that `today` falls in.
///
/// April 1st itself belongs to the new financial year.
pub fn financial_year_start(today: NaiveDate) -> NaiveDate {
    let year = if today.month() >= FINANCIAL_YEAR_START_MONTH {
        today.year()
    } else {
        today.year() - 1
    };

    // April 1st exists in every year chrono can represent
    NaiveDate::from_ymd_opt(year, FINANCIAL_YEAR_START_MONTH, 1).unwrap_or(today)
}

/// Label for a calendar month, or None outside 1-12
pub fn month_label(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_LABELS.get(idx as usize).copied())
}

/// Local reporting clock.
///
/// Reports are cut over at local midnight, so "today" is derived from UTC
/// through a fixed offset (India Standard Time by default).
#[derive(Debug, Clone, Copy)]
pub struct ReportingClock {
    offset: FixedOffset,
}

impl ReportingClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Clock for an offset in minutes east of UTC
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes * 60).map(Self::new)
    }

    /// Local date for a UTC instant
    pub fn date_at(&self, utc_time: DateTime<Utc>) -> NaiveDate {
        utc_time.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}
