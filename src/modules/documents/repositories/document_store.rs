use async_trait::async_trait;

use crate::core::Result;
use crate::modules::documents::models::{DocumentFilter, DocumentKind, DocumentTotals, LineItem, Page};
use crate::modules::invoices::models::Invoice;
use crate::modules::quotations::models::Quotation;

/// Tenant-scoped access to invoices, quotations and their line items.
///
/// Reads outside a transaction see committed data only. Every mutation goes
/// through a [`DocumentTransaction`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn DocumentTransaction>>;

    /// Invoice with its line items, if it belongs to one of the tenant's parties
    async fn find_invoice(&self, user_id: i64, invoice_id: i64) -> Result<Option<Invoice>>;

    async fn find_quotation(&self, user_id: i64, quotation_id: i64)
        -> Result<Option<Quotation>>;

    /// Matching invoice headers, without line items
    async fn list_invoices(&self, user_id: i64, filter: &DocumentFilter) -> Result<Page<Invoice>>;

    async fn list_quotations(
        &self,
        user_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Page<Quotation>>;
}

/// One atomic unit of work against the document store.
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// its writes.
#[async_trait]
pub trait DocumentTransaction: Send {
    /// Inserts the invoice header and returns its id. Totals start at zero.
    async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<i64>;

    /// Writes header fields. Totals and line items are not touched.
    async fn update_invoice(&mut self, invoice: &Invoice) -> Result<()>;

    async fn find_invoice(&mut self, user_id: i64, invoice_id: i64) -> Result<Option<Invoice>>;

    /// Deletes the invoice and its line items
    async fn delete_invoice(&mut self, invoice_id: i64) -> Result<bool>;

    async fn insert_quotation(&mut self, quotation: &Quotation) -> Result<i64>;

    async fn update_quotation(&mut self, quotation: &Quotation) -> Result<()>;

    async fn find_quotation(
        &mut self,
        user_id: i64,
        quotation_id: i64,
    ) -> Result<Option<Quotation>>;

    async fn delete_quotation(&mut self, quotation_id: i64) -> Result<bool>;

    async fn insert_line_items(
        &mut self,
        kind: DocumentKind,
        document_id: i64,
        items: &[LineItem],
    ) -> Result<()>;

    /// Removes every line item of the document, returning how many were removed
    async fn delete_line_items(&mut self, kind: DocumentKind, document_id: i64) -> Result<u64>;

    async fn load_line_items(&mut self, kind: DocumentKind, document_id: i64)
        -> Result<Vec<LineItem>>;

    /// Stores the three summary columns of a document.
    ///
    /// This is the only write path for those columns. Fails with an
    /// integrity error when the document row does not exist.
    async fn write_totals(
        &mut self,
        kind: DocumentKind,
        document_id: i64,
        totals: &DocumentTotals,
    ) -> Result<()>;

    /// Serializes invoice numbering for one tenant until the transaction ends.
    ///
    /// Taken before checking or assigning a bill number, so two writers
    /// cannot both see a number as free.
    async fn lock_invoice_numbers(&mut self, user_id: i64) -> Result<()>;

    /// Next value of the tenant's invoice number sequence
    async fn next_invoice_number(&mut self, user_id: i64) -> Result<i64>;

    async fn invoice_number_taken(
        &mut self,
        user_id: i64,
        bill_no: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool>;

    async fn quotation_number_taken(
        &mut self,
        quotation_no: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
