mod aggregates;
mod query;
mod report;

pub use aggregates::{
    DocumentAggregate, InvoiceLines, MonthlyAggregate, PaidAggregate, PartyAmount,
};
pub use query::{parse_flag, DateRange, DocumentQuery};
pub use report::{
    DashboardSummary, InvoiceTaxSummary, MonthlyAmount, MonthlyCount, MonthlyTaxReport,
    PaidUnpaidSplit, PartySummary, TopClient,
};
