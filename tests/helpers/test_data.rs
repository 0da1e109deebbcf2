// Test Data Factory
//
// Builds requests and wires services over the in-memory store.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use gstbill::core::ReportingClock;
use gstbill::documents::models::LineItemRequest;
use gstbill::documents::TotalsService;
use gstbill::invoices::models::CreateInvoiceRequest;
use gstbill::invoices::{InvoiceService, InvoiceSettings};
use gstbill::quotations::models::CreateQuotationRequest;
use gstbill::quotations::QuotationService;
use gstbill::reports::ReportService;

use super::memory_store::MemoryStore;

pub const TENANT: i64 = 1;
pub const OTHER_TENANT: i64 = 2;

pub const INVOICE_TERMS: &str = "Payment due on presentation";
pub const QUOTATION_TERMS: &str = "Valid for 30 days";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// Test data factory for requests and payloads
pub struct TestDataFactory;

impl TestDataFactory {
    pub fn line_item(
        description: &str,
        quantity: i32,
        unit_price: &str,
        cgst: &str,
        sgst: &str,
        igst: &str,
    ) -> LineItemRequest {
        LineItemRequest {
            description: description.to_string(),
            hsn_code: Some(8471),
            quantity,
            unit_type: Some("NOS".to_string()),
            unit_price: decimal(unit_price),
            cgst: decimal(cgst),
            sgst: decimal(sgst),
            igst: decimal(igst),
        }
    }

    /// 10 × 50.00 at 9% CGST + 9% SGST: 500 before, 90 GST, 590 after
    pub fn intra_state_item() -> LineItemRequest {
        Self::line_item("Printer cartridge", 10, "50.00", "9", "9", "0")
    }

    /// 2 × 250.00 at 18% IGST: 500 before, 90 GST, 590 after
    pub fn inter_state_item() -> LineItemRequest {
        Self::line_item("Toner", 2, "250.00", "0", "0", "18")
    }

    pub fn invoice_request(
        party_id: i64,
        on: NaiveDate,
        line_items: Vec<LineItemRequest>,
    ) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            party_id,
            bill_no: None,
            order_no: Some("PO-17".to_string()),
            date: Some(on),
            transport_mode: Some("Road".to_string()),
            vehicle_no: Some("MH12AB1234".to_string()),
            date_of_supply: None,
            place_of_supply: Some("Pune".to_string()),
            gst_reverse_charge: None,
            terms: None,
            is_paid: false,
            line_items,
        }
    }

    pub fn quotation_request(
        party_id: i64,
        quotation_no: i64,
        on: NaiveDate,
        line_items: Vec<LineItemRequest>,
    ) -> CreateQuotationRequest {
        CreateQuotationRequest {
            party_id,
            quotation_no,
            date: Some(on),
            subject: "Annual maintenance".to_string(),
            terms: None,
            line_items,
        }
    }

    /// JSON body for POST /invoices
    pub fn invoice_payload(party_id: i64) -> Value {
        json!({
            "party_id": party_id,
            "date": "2025-04-10",
            "line_items": [{
                "description": "Printer cartridge",
                "hsn_code": 8471,
                "quantity": 10,
                "unit_type": "nos",
                "unit_price": "50.00",
                "cgst": "9",
                "sgst": "9"
            }]
        })
    }
}

/// Services wired over one shared [`MemoryStore`]
pub struct TestServices {
    pub store: MemoryStore,
    pub invoices: Arc<InvoiceService>,
    pub quotations: Arc<QuotationService>,
    pub totals: Arc<TotalsService>,
    pub reports: Arc<ReportService>,
    pub clock: ReportingClock,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let shared = Arc::new(store.clone());
        let clock = ReportingClock::from_offset_minutes(330).unwrap();

        Self {
            invoices: Arc::new(InvoiceService::new(
                shared.clone(),
                shared.clone(),
                InvoiceSettings {
                    number_prefix: "INV-".to_string(),
                    default_terms: INVOICE_TERMS.to_string(),
                },
                clock,
            )),
            quotations: Arc::new(QuotationService::new(
                shared.clone(),
                shared.clone(),
                QUOTATION_TERMS.to_string(),
                clock,
            )),
            totals: Arc::new(TotalsService::new(shared.clone())),
            reports: Arc::new(ReportService::new(shared.clone(), shared)),
            store,
            clock,
        }
    }
}
