use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::documents::models::{DocumentKind, DocumentTotals};
use crate::modules::documents::repositories::{DocumentStore, DocumentTransaction};
use crate::modules::documents::services::recompute_and_store;

/// Recomputes the stored totals of a single document on request
pub struct TotalsService {
    store: Arc<dyn DocumentStore>,
}

impl TotalsService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn recompute_document_totals(
        &self,
        user_id: i64,
        kind: DocumentKind,
        document_id: i64,
    ) -> Result<DocumentTotals> {
        let mut tx = self.store.begin().await?;

        match recompute_in(tx.as_mut(), user_id, kind, document_id).await {
            Ok(totals) => {
                tx.commit().await?;
                Ok(totals)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }
}

async fn recompute_in(
    tx: &mut dyn DocumentTransaction,
    user_id: i64,
    kind: DocumentKind,
    document_id: i64,
) -> Result<DocumentTotals> {
    let not_found = || AppError::not_found(format!("{} {} not found", kind, document_id));

    match kind {
        DocumentKind::Invoice => {
            let mut invoice = tx
                .find_invoice(user_id, document_id)
                .await?
                .ok_or_else(not_found)?;
            recompute_and_store(tx, &mut invoice).await?;
            Ok(invoice.totals)
        }
        DocumentKind::Quotation => {
            let mut quotation = tx
                .find_quotation(user_id, document_id)
                .await?
                .ok_or_else(not_found)?;
            recompute_and_store(tx, &mut quotation).await?;
            Ok(quotation.totals)
        }
    }
}
