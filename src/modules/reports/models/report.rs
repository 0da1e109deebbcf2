use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::money::serialize_amount;
use crate::modules::documents::models::DocumentKind;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub invoice_count: i64,
    pub quotation_count: i64,
    pub party_count: i64,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount_with_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_gst: Decimal,
    /// `total_amount_with_gst - total_gst`
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub quotation_total_amount_with_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub quotation_total_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub quotation_total_amount: Decimal,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: &'static str,
    pub invoices: i64,
    pub quotations: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAmount {
    pub month: &'static str,
    #[serde(serialize_with = "serialize_amount")]
    pub invoice_amount: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub gst_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopClient {
    pub party_id: i64,
    pub name: String,
    /// Whole rupees, fraction dropped
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaidUnpaidSplit {
    #[serde(serialize_with = "serialize_amount")]
    pub total: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub paid: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub pending: Decimal,
}

/// GST breakdown of one invoice, computed from its line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTaxSummary {
    pub invoice_id: i64,
    pub bill_no: String,
    pub date: NaiveDate,
    pub party_name: String,
    pub party_gstin: Option<String>,
    #[serde(serialize_with = "serialize_amount")]
    pub cgst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub sgst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub igst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub amount_without_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub amount_with_gst: Decimal,
}

/// Monthly GST return figures for outward supplies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTaxReport {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub invoice_count: i64,
    #[serde(serialize_with = "serialize_amount")]
    pub total_cgst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_sgst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_igst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount_without_gst: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount_with_gst: Decimal,
    pub invoices: Vec<InvoiceTaxSummary>,
}

/// Totals across every document of one party, from line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartySummary {
    pub party_name: String,
    pub kind: DocumentKind,
    #[serde(serialize_with = "serialize_amount")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub total_gst: Decimal,
    pub total_units: i64,
    pub document_count: i64,
}
