use std::sync::Arc;

use chrono::Utc;

use crate::core::{AppError, ReportingClock, Result};
use crate::modules::documents::models::{
    parse_line_items, DocumentFilter, DocumentKind, DocumentTotals, LineItem, Page,
};
use crate::modules::documents::repositories::{DocumentStore, DocumentTransaction};
use crate::modules::documents::services::recompute_and_store;
use crate::modules::invoices::models::{
    ConvertQuotationRequest, CreateInvoiceRequest, Invoice, UpdateInvoiceRequest,
};
use crate::modules::parties::repositories::PartyDirectory;

/// Invoice numbering and default text
#[derive(Debug, Clone, Default)]
pub struct InvoiceSettings {
    /// Prepended to numbers taken from the tenant's sequence
    pub number_prefix: String,
    pub default_terms: String,
}

/// Service for invoice lifecycle operations.
///
/// Every mutation runs in one store transaction: header, line items and
/// totals land together or not at all.
pub struct InvoiceService {
    store: Arc<dyn DocumentStore>,
    parties: Arc<dyn PartyDirectory>,
    settings: InvoiceSettings,
    clock: ReportingClock,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn not_found(invoice_id: i64) -> AppError {
    AppError::not_found(format!("Invoice {} not found", invoice_id))
}

impl InvoiceService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        parties: Arc<dyn PartyDirectory>,
        settings: InvoiceSettings,
        clock: ReportingClock,
    ) -> Self {
        Self {
            store,
            parties,
            settings,
            clock,
        }
    }

    async fn require_party(&self, user_id: i64, party_id: i64) -> Result<()> {
        self.parties
            .find_for_tenant(user_id, party_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Party {} not found", party_id)))
    }

    /// Takes numbers from the tenant's sequence until one is free.
    ///
    /// Callers hold the tenant's numbering lock.
    async fn allocate_number(&self, tx: &mut dyn DocumentTransaction, user_id: i64) -> Result<String> {
        loop {
            let next = tx.next_invoice_number(user_id).await?;
            let bill_no = format!("{}{}", self.settings.number_prefix, next);

            if !tx.invoice_number_taken(user_id, &bill_no, None).await? {
                return Ok(bill_no);
            }

            tracing::debug!(user_id, bill_no = %bill_no, "Skipping invoice number already in use");
        }
    }

    /// Inserts a header and its line items, then stores fresh totals
    async fn persist_new(
        &self,
        tx: &mut dyn DocumentTransaction,
        user_id: i64,
        invoice: &Invoice,
        line_items: &[LineItem],
    ) -> Result<Invoice> {
        let invoice_id = tx.insert_invoice(invoice).await?;
        tx.insert_line_items(DocumentKind::Invoice, invoice_id, line_items)
            .await?;

        let mut stored = tx
            .find_invoice(user_id, invoice_id)
            .await?
            .ok_or_else(|| {
                AppError::integrity(format!("Invoice {} missing after insert", invoice_id))
            })?;

        recompute_and_store(tx, &mut stored).await?;
        Ok(stored)
    }

    /// Create an invoice with at least one line item
    pub async fn create_invoice(
        &self,
        user_id: i64,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice> {
        let line_items = parse_line_items(request.line_items.clone())?;
        if line_items.is_empty() {
            return Err(AppError::validation(
                "Invoice must have at least one line item",
            ));
        }

        self.require_party(user_id, request.party_id).await?;

        let mut tx = self.store.begin().await?;
        match self
            .create_in(tx.as_mut(), user_id, request, &line_items)
            .await
        {
            Ok(invoice) => {
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    invoice_id = invoice.id,
                    bill_no = %invoice.bill_no,
                    line_items = invoice.line_items.len(),
                    total_amount_after_gst = %invoice.totals.total_amount_after_gst,
                    "Invoice created"
                );

                Ok(invoice)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    async fn create_in(
        &self,
        tx: &mut dyn DocumentTransaction,
        user_id: i64,
        request: CreateInvoiceRequest,
        line_items: &[LineItem],
    ) -> Result<Invoice> {
        tx.lock_invoice_numbers(user_id).await?;

        let bill_no = match blank_to_none(request.bill_no) {
            Some(bill_no) => {
                if tx.invoice_number_taken(user_id, &bill_no, None).await? {
                    return Err(AppError::validation(format!(
                        "Invoice number '{}' already exists",
                        bill_no
                    )));
                }
                bill_no
            }
            None => self.allocate_number(tx, user_id).await?,
        };

        let now = Utc::now();
        let invoice = Invoice {
            id: 0,
            party_id: request.party_id,
            bill_no,
            order_no: blank_to_none(request.order_no),
            date: request.date.unwrap_or_else(|| self.clock.today()),
            transport_mode: blank_to_none(request.transport_mode),
            vehicle_no: blank_to_none(request.vehicle_no),
            date_of_supply: request.date_of_supply,
            place_of_supply: blank_to_none(request.place_of_supply),
            gst_reverse_charge: request.gst_reverse_charge,
            terms: blank_to_none(request.terms)
                .unwrap_or_else(|| self.settings.default_terms.clone()),
            is_paid: request.is_paid,
            totals: DocumentTotals::zero(),
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.persist_new(tx, user_id, &invoice, line_items).await
    }

    /// Apply field changes; a non-empty line item list replaces all items
    pub async fn update_invoice(
        &self,
        user_id: i64,
        invoice_id: i64,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice> {
        let replacement = match request.line_items.clone() {
            Some(items) if !items.is_empty() => Some(parse_line_items(items)?),
            _ => None,
        };

        if let Some(party_id) = request.party_id {
            self.require_party(user_id, party_id).await?;
        }

        let mut tx = self.store.begin().await?;
        match self
            .update_in(tx.as_mut(), user_id, invoice_id, request, replacement)
            .await
        {
            Ok(invoice) => {
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    invoice_id,
                    total_amount_after_gst = %invoice.totals.total_amount_after_gst,
                    "Invoice updated"
                );

                Ok(invoice)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    async fn update_in(
        &self,
        tx: &mut dyn DocumentTransaction,
        user_id: i64,
        invoice_id: i64,
        request: UpdateInvoiceRequest,
        replacement: Option<Vec<LineItem>>,
    ) -> Result<Invoice> {
        let mut invoice = tx
            .find_invoice(user_id, invoice_id)
            .await?
            .ok_or_else(|| not_found(invoice_id))?;

        if let Some(bill_no) = request.bill_no {
            let bill_no = bill_no.trim().to_string();
            if bill_no.is_empty() {
                return Err(AppError::validation("Invoice number cannot be empty"));
            }
            tx.lock_invoice_numbers(user_id).await?;
            if tx
                .invoice_number_taken(user_id, &bill_no, Some(invoice_id))
                .await?
            {
                return Err(AppError::validation(format!(
                    "Invoice number '{}' already exists",
                    bill_no
                )));
            }
            invoice.bill_no = bill_no;
        }

        if let Some(party_id) = request.party_id {
            invoice.party_id = party_id;
        }
        if let Some(date) = request.date {
            invoice.date = date;
        }
        if request.order_no.is_some() {
            invoice.order_no = blank_to_none(request.order_no);
        }
        if request.transport_mode.is_some() {
            invoice.transport_mode = blank_to_none(request.transport_mode);
        }
        if request.vehicle_no.is_some() {
            invoice.vehicle_no = blank_to_none(request.vehicle_no);
        }
        if let Some(date_of_supply) = request.date_of_supply {
            invoice.date_of_supply = Some(date_of_supply);
        }
        if request.place_of_supply.is_some() {
            invoice.place_of_supply = blank_to_none(request.place_of_supply);
        }
        if let Some(gst_reverse_charge) = request.gst_reverse_charge {
            invoice.gst_reverse_charge = Some(gst_reverse_charge);
        }
        if let Some(terms) = request.terms {
            invoice.terms = terms;
        }
        if let Some(is_paid) = request.is_paid {
            invoice.is_paid = is_paid;
        }
        invoice.updated_at = Utc::now();

        tx.update_invoice(&invoice).await?;

        if let Some(items) = replacement {
            let removed = tx
                .delete_line_items(DocumentKind::Invoice, invoice_id)
                .await?;
            tx.insert_line_items(DocumentKind::Invoice, invoice_id, &items)
                .await?;

            tracing::debug!(
                invoice_id,
                removed,
                inserted = items.len(),
                "Invoice line items replaced"
            );
        }

        let mut stored = tx
            .find_invoice(user_id, invoice_id)
            .await?
            .ok_or_else(|| not_found(invoice_id))?;

        recompute_and_store(tx, &mut stored).await?;
        Ok(stored)
    }

    /// Create a new unpaid invoice from one of the tenant's quotations.
    ///
    /// The quotation and its line items are left untouched.
    pub async fn convert_quotation(
        &self,
        user_id: i64,
        request: ConvertQuotationRequest,
    ) -> Result<Invoice> {
        let quotation_id = request.quotation_id;

        let mut tx = self.store.begin().await?;
        match self.convert_in(tx.as_mut(), user_id, request).await {
            Ok(invoice) => {
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    quotation_id,
                    invoice_id = invoice.id,
                    bill_no = %invoice.bill_no,
                    "Quotation converted to invoice"
                );

                Ok(invoice)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    async fn convert_in(
        &self,
        tx: &mut dyn DocumentTransaction,
        user_id: i64,
        request: ConvertQuotationRequest,
    ) -> Result<Invoice> {
        let quotation = tx
            .find_quotation(user_id, request.quotation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Quotation {} not found", request.quotation_id))
            })?;

        tx.lock_invoice_numbers(user_id).await?;
        let bill_no = self.allocate_number(tx, user_id).await?;
        let date = request.date.unwrap_or(quotation.date);
        let now = Utc::now();

        let invoice = Invoice {
            id: 0,
            party_id: quotation.party_id,
            bill_no,
            order_no: blank_to_none(request.order_no),
            date,
            transport_mode: blank_to_none(request.transport_mode),
            vehicle_no: blank_to_none(request.vehicle_no),
            date_of_supply: request.date_of_supply.or(Some(date)),
            place_of_supply: blank_to_none(request.place_of_supply),
            gst_reverse_charge: request.gst_reverse_charge,
            terms: quotation.terms.clone(),
            is_paid: false,
            totals: DocumentTotals::zero(),
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let line_items: Vec<LineItem> = quotation.line_items.iter().map(LineItem::detached).collect();

        self.persist_new(tx, user_id, &invoice, &line_items).await
    }

    pub async fn get_invoice(&self, user_id: i64, invoice_id: i64) -> Result<Invoice> {
        self.store
            .find_invoice(user_id, invoice_id)
            .await?
            .ok_or_else(|| not_found(invoice_id))
    }

    pub async fn list_invoices(&self, user_id: i64, filter: &DocumentFilter) -> Result<Page<Invoice>> {
        self.store.list_invoices(user_id, filter).await
    }

    /// Delete an invoice together with its line items
    pub async fn delete_invoice(&self, user_id: i64, invoice_id: i64) -> Result<()> {
        let mut tx = self.store.begin().await?;

        let result = match tx.find_invoice(user_id, invoice_id).await {
            Ok(Some(_)) => tx.delete_invoice(invoice_id).await.map(|_| ()),
            Ok(None) => Err(not_found(invoice_id)),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                tx.commit().await?;
                tracing::info!(user_id, invoice_id, "Invoice deleted");
                Ok(())
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }
}
