use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::documents::models::{
    DocumentKind, DocumentTotals, DocumentTotalsResponse, LineItem, LineItemRequest,
    LineItemResponse,
};
use crate::modules::documents::services::TaxableDocument;

/// A tax invoice ("bill") issued to a party
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub party_id: i64,
    /// Invoice number, unique per tenant
    pub bill_no: String,
    pub order_no: Option<String>,
    pub date: NaiveDate,
    pub transport_mode: Option<String>,
    pub vehicle_no: Option<String>,
    pub date_of_supply: Option<NaiveDate>,
    pub place_of_supply: Option<String>,
    /// GST payable on reverse charge
    pub gst_reverse_charge: Option<i32>,
    pub terms: String,
    pub is_paid: bool,
    pub totals: DocumentTotals,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaxableDocument for Invoice {
    const KIND: DocumentKind = DocumentKind::Invoice;

    fn document_id(&self) -> i64 {
        self.id
    }

    fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    fn totals(&self) -> &DocumentTotals {
        &self.totals
    }

    fn set_totals(&mut self, totals: DocumentTotals) {
        self.totals = totals;
    }
}

/// Request to create an invoice
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub party_id: i64,
    /// Allocated from the tenant's sequence when omitted
    #[serde(default)]
    pub bill_no: Option<String>,
    #[serde(default)]
    pub order_no: Option<String>,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub vehicle_no: Option<String>,
    #[serde(default)]
    pub date_of_supply: Option<NaiveDate>,
    #[serde(default)]
    pub place_of_supply: Option<String>,
    #[serde(default)]
    pub gst_reverse_charge: Option<i32>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

/// Partial update; absent fields are left unchanged.
///
/// A non-empty `line_items` replaces every existing line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub party_id: Option<i64>,
    pub bill_no: Option<String>,
    pub order_no: Option<String>,
    pub date: Option<NaiveDate>,
    pub transport_mode: Option<String>,
    pub vehicle_no: Option<String>,
    pub date_of_supply: Option<NaiveDate>,
    pub place_of_supply: Option<String>,
    pub gst_reverse_charge: Option<i32>,
    pub terms: Option<String>,
    pub is_paid: Option<bool>,
    pub line_items: Option<Vec<LineItemRequest>>,
}

/// Request to turn a quotation into a new invoice
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertQuotationRequest {
    pub quotation_id: i64,
    /// Overrides the quotation date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub order_no: Option<String>,
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub vehicle_no: Option<String>,
    /// Defaults to the invoice date
    #[serde(default)]
    pub date_of_supply: Option<NaiveDate>,
    #[serde(default)]
    pub place_of_supply: Option<String>,
    #[serde(default)]
    pub gst_reverse_charge: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub party_id: i64,
    pub bill_no: String,
    pub order_no: Option<String>,
    pub date: NaiveDate,
    pub transport_mode: Option<String>,
    pub vehicle_no: Option<String>,
    pub date_of_supply: Option<NaiveDate>,
    pub place_of_supply: Option<String>,
    pub gst_reverse_charge: Option<i32>,
    pub terms: String,
    pub is_paid: bool,
    #[serde(flatten)]
    pub totals: DocumentTotalsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItemResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceResponse {
    /// Header and totals only, as used in listings
    pub fn summary(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            party_id: invoice.party_id,
            bill_no: invoice.bill_no.clone(),
            order_no: invoice.order_no.clone(),
            date: invoice.date,
            transport_mode: invoice.transport_mode.clone(),
            vehicle_no: invoice.vehicle_no.clone(),
            date_of_supply: invoice.date_of_supply,
            place_of_supply: invoice.place_of_supply.clone(),
            gst_reverse_charge: invoice.gst_reverse_charge,
            terms: invoice.terms.clone(),
            is_paid: invoice.is_paid,
            totals: DocumentTotalsResponse::from(&invoice.totals),
            line_items: None,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            line_items: Some(invoice.line_items.iter().map(LineItemResponse::from).collect()),
            ..Self::summary(invoice)
        }
    }
}
