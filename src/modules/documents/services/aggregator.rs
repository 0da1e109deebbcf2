use crate::core::money::MAX_AMOUNT;
use crate::core::{AppError, Result};
use crate::modules::documents::models::{DocumentKind, DocumentTotals, LineItem};
use crate::modules::documents::repositories::DocumentTransaction;

/// A document whose summary columns are derived from its line items
pub trait TaxableDocument {
    const KIND: DocumentKind;

    fn document_id(&self) -> i64;

    fn line_items(&self) -> &[LineItem];

    fn totals(&self) -> &DocumentTotals;

    fn set_totals(&mut self, totals: DocumentTotals);
}

/// Re-aggregates the document's line items into its summary fields
pub fn recompute_totals<T: TaxableDocument>(document: &mut T) {
    let totals = DocumentTotals::from_line_items(document.line_items());
    document.set_totals(totals);
}

/// Every line item must be persisted against this document
fn ensure_line_items_attached<T: TaxableDocument>(document: &T) -> Result<()> {
    let id = document.document_id();

    for item in document.line_items() {
        if item.document_id != Some(id) {
            return Err(AppError::integrity(format!(
                "{} {} holds a line item attached to {:?}",
                T::KIND,
                id,
                item.document_id
            )));
        }
    }

    Ok(())
}

/// Summary columns are `DECIMAL(12,2)`
fn ensure_totals_fit<T: TaxableDocument>(document: &T) -> Result<()> {
    let total = document.totals().total_amount_after_gst;
    if total > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{} total after GST cannot exceed {}, got {}",
            T::KIND,
            MAX_AMOUNT,
            total
        )));
    }
    Ok(())
}

/// Recomputes the totals of a document loaded inside `tx` and stores them
/// in the same transaction.
pub async fn recompute_and_store<T>(tx: &mut dyn DocumentTransaction, document: &mut T) -> Result<()>
where
    T: TaxableDocument + Send,
{
    ensure_line_items_attached(document)?;
    recompute_totals(document);
    ensure_totals_fit(document)?;

    tx.write_totals(T::KIND, document.document_id(), document.totals())
        .await?;

    tracing::debug!(
        kind = %T::KIND,
        document_id = document.document_id(),
        line_items = document.line_items().len(),
        total_gst_amount = %document.totals().total_gst_amount,
        total_amount_after_gst = %document.totals().total_amount_after_gst,
        "Document totals recomputed"
    );

    Ok(())
}
