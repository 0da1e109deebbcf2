use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::documents::models::DocumentKind;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Sortable columns of a document listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Date,
    TotalAmountAfterGst,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl DocumentOrdering {
    /// Column name for this ordering on the given document table
    pub fn column(&self, kind: DocumentKind) -> &'static str {
        match self.field {
            OrderField::Date => "date",
            OrderField::TotalAmountAfterGst => "total_amount_after_gst",
            OrderField::Number => kind.number_column(),
        }
    }
}

impl Default for DocumentOrdering {
    fn default() -> Self {
        Self {
            field: OrderField::Date,
            descending: true,
        }
    }
}

impl FromStr for DocumentOrdering {
    type Err = AppError;

    /// Parses `date`, `-total_amount_after_gst`, `bill_no`, ...
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let field = match name {
            "date" => OrderField::Date,
            "total_amount_after_gst" => OrderField::TotalAmountAfterGst,
            "number" | "bill_no" | "quotation_no" => OrderField::Number,
            other => {
                return Err(AppError::validation(format!(
                    "Cannot order by '{}'",
                    other
                )))
            }
        };

        Ok(Self { field, descending })
    }
}

/// Raw listing query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListQuery {
    /// Case-insensitive substring of the party name
    pub party: Option<String>,
    #[serde(alias = "bill_no", alias = "quotation_no")]
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated listing criteria, always scoped to one tenant by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFilter {
    pub party_name: Option<String>,
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub ordering: DocumentOrdering,
    pub limit: i64,
    pub offset: i64,
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            party_name: None,
            number: None,
            date: None,
            date_after: None,
            date_before: None,
            min_amount: None,
            max_amount: None,
            ordering: DocumentOrdering::default(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DocumentListQuery {
    pub fn into_filter(self) -> Result<DocumentFilter> {
        if let (Some(after), Some(before)) = (self.date_after, self.date_before) {
            if after > before {
                return Err(AppError::validation(
                    "date_after cannot be later than date_before",
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(AppError::validation(
                    "min_amount cannot be greater than max_amount",
                ));
            }
        }

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit <= 0 {
            return Err(AppError::validation("limit must be greater than 0"));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::validation("offset cannot be negative"));
        }

        let ordering = match non_blank(self.ordering) {
            Some(ordering) => ordering.parse()?,
            None => DocumentOrdering::default(),
        };

        Ok(DocumentFilter {
            party_name: non_blank(self.party),
            number: non_blank(self.number),
            date: self.date,
            date_after: self.date_after,
            date_before: self.date_before,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            ordering,
            limit: limit.min(MAX_PAGE_SIZE),
            offset,
        })
    }
}

/// One page of a listing with the total number of matches
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
