use chrono::{Datelike, Months, NaiveDate};

use crate::core::{AppError, FinancialYear, Result};

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AppError::validation(format!(
                "from_date ({}) must be before or equal to to_date ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses optional `YYYY-MM-DD` bounds; both or neither must be given
    pub fn from_params(from_date: Option<&str>, to_date: Option<&str>) -> Result<Option<Self>> {
        match (from_date, to_date) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => {
                let start = parse_date("from_date", from)?;
                let end = parse_date("to_date", to)?;
                Self::new(start, end).map(Some)
            }
            _ => Err(AppError::validation(
                "from_date and to_date must be given together",
            )),
        }
    }

    /// Every day of a calendar month
    pub fn calendar_month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AppError::validation(format!("Invalid month {}-{}; month must be 1-12", year, month))
        })?;

        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };

        let end = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| AppError::validation(format!("Year {} is out of range", year)))?;

        Ok(Self { start, end })
    }

    /// The given range, or the financial year to date
    pub fn or_financial_year(range: Option<Self>, today: NaiveDate) -> Self {
        range.unwrap_or_else(|| {
            let fy = FinancialYear::to_date(today);
            Self {
                start: fy.start,
                end: fy.end,
            }
        })
    }

    /// Month series bucket by calendar month alone, so the window must not
    /// reach the same month of the following year
    pub fn ensure_distinct_months(&self) -> Result<()> {
        let limit = NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), 1)
            .and_then(|first| first.checked_add_months(Months::new(12)));

        match limit {
            Some(limit) if self.end >= limit => Err(AppError::validation(format!(
                "Monthly reports cover at most 12 calendar months; {} to {} spans more",
                self.start, self.end
            ))),
            _ => Ok(()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DD",
            label, value
        ))
    })
}

/// Parses an optional `true`/`false` flag
pub fn parse_flag(label: &str, value: Option<&str>) -> Result<Option<bool>> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) if v == "true" => Ok(Some(true)),
        Some(v) if v == "false" => Ok(Some(false)),
        Some(v) => Err(AppError::validation(format!(
            "Invalid {} value '{}'. Expected true or false",
            label, v
        ))),
    }
}

/// Filters shared by document aggregate queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub range: Option<DateRange>,
    /// Ignored for quotations
    pub is_paid: Option<bool>,
}
