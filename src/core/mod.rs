pub mod error;
pub mod financial_year;
pub mod money;

pub use error::{AppError, Result};
pub use financial_year::{financial_year_start, FinancialYear, ReportingClock};
pub use money::{format_amount, round_currency};
