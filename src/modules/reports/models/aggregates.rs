use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::modules::documents::models::LineItem;

/// Count and summed cached totals of a set of documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentAggregate {
    pub count: i64,
    pub amount_after_gst: Decimal,
    pub gst: Decimal,
}

/// [`DocumentAggregate`] for one calendar month (1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAggregate {
    pub month: u32,
    pub count: i64,
    pub amount_after_gst: Decimal,
    pub gst: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyAmount {
    pub party_id: i64,
    pub party_name: String,
    pub amount_after_gst: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaidAggregate {
    pub total: Decimal,
    pub paid: Decimal,
}

/// An invoice with its line items, as read for tax returns
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLines {
    pub invoice_id: i64,
    pub bill_no: String,
    pub date: NaiveDate,
    pub party_name: String,
    pub party_gstin: Option<String>,
    pub line_items: Vec<LineItem>,
}
