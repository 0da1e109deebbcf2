use std::sync::Arc;

use chrono::Utc;

use crate::core::{AppError, ReportingClock, Result};
use crate::modules::documents::models::{
    parse_line_items, DocumentFilter, DocumentKind, DocumentTotals, LineItem, Page,
};
use crate::modules::documents::repositories::{DocumentStore, DocumentTransaction};
use crate::modules::documents::services::recompute_and_store;
use crate::modules::parties::repositories::PartyDirectory;
use crate::modules::quotations::models::{
    CreateQuotationRequest, Quotation, UpdateQuotationRequest,
};

/// Service for quotation lifecycle operations
pub struct QuotationService {
    store: Arc<dyn DocumentStore>,
    parties: Arc<dyn PartyDirectory>,
    default_terms: String,
    clock: ReportingClock,
}

fn not_found(quotation_id: i64) -> AppError {
    AppError::not_found(format!("Quotation {} not found", quotation_id))
}

fn validate_number(quotation_no: i64) -> Result<()> {
    if quotation_no <= 0 {
        return Err(AppError::validation(format!(
            "Quotation number must be positive, got {}",
            quotation_no
        )));
    }
    Ok(())
}

async fn ensure_number_free(
    tx: &mut dyn DocumentTransaction,
    quotation_no: i64,
    exclude_id: Option<i64>,
) -> Result<()> {
    if tx.quotation_number_taken(quotation_no, exclude_id).await? {
        return Err(AppError::validation(format!(
            "Quotation number {} already exists",
            quotation_no
        )));
    }
    Ok(())
}

impl QuotationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        parties: Arc<dyn PartyDirectory>,
        default_terms: String,
        clock: ReportingClock,
    ) -> Self {
        Self {
            store,
            parties,
            default_terms,
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

    pub async fn create_quotation(
        &self,
        user_id: i64,
        request: CreateQuotationRequest,
    ) -> Result<Quotation> {
        let line_items = parse_line_items(request.line_items.clone())?;
        if line_items.is_empty() {
            return Err(AppError::validation(
                "Quotation must have at least one line item",
            ));
        }
        validate_number(request.quotation_no)?;

        self.require_party(user_id, request.party_id).await?;

        let mut tx = self.store.begin().await?;
        match self
            .create_in(tx.as_mut(), user_id, request, &line_items)
            .await
        {
            Ok(quotation) => {
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    quotation_id = quotation.id,
                    quotation_no = quotation.quotation_no,
                    line_items = quotation.line_items.len(),
                    total_amount_after_gst = %quotation.totals.total_amount_after_gst,
                    "Quotation created"
                );

                Ok(quotation)
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
        request: CreateQuotationRequest,
        line_items: &[LineItem],
    ) -> Result<Quotation> {
        ensure_number_free(tx, request.quotation_no, None).await?;

        let now = Utc::now();
        let quotation = Quotation {
            id: 0,
            party_id: request.party_id,
            quotation_no: request.quotation_no,
            date: request.date.unwrap_or_else(|| self.clock.today()),
            subject: request.subject.trim().to_string(),
            terms: request
                .terms
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| self.default_terms.clone()),
            totals: DocumentTotals::zero(),
            line_items: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let quotation_id = tx.insert_quotation(&quotation).await?;
        tx.insert_line_items(DocumentKind::Quotation, quotation_id, line_items)
            .await?;

        let mut stored = tx
            .find_quotation(user_id, quotation_id)
            .await?
            .ok_or_else(|| {
                AppError::integrity(format!("Quotation {} missing after insert", quotation_id))
            })?;

        recompute_and_store(tx, &mut stored).await?;
        Ok(stored)
    }

    /// Apply field changes; a non-empty line item list replaces all items
    pub async fn update_quotation(
        &self,
        user_id: i64,
        quotation_id: i64,
        request: UpdateQuotationRequest,
    ) -> Result<Quotation> {
        let replacement = match request.line_items.clone() {
            Some(items) if !items.is_empty() => Some(parse_line_items(items)?),
            _ => None,
        };

        if let Some(quotation_no) = request.quotation_no {
            validate_number(quotation_no)?;
        }
        if let Some(party_id) = request.party_id {
            self.require_party(user_id, party_id).await?;
        }

        let mut tx = self.store.begin().await?;
        match self
            .update_in(tx.as_mut(), user_id, quotation_id, request, replacement)
            .await
        {
            Ok(quotation) => {
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    quotation_id,
                    total_amount_after_gst = %quotation.totals.total_amount_after_gst,
                    "Quotation updated"
                );

                Ok(quotation)
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
        quotation_id: i64,
        request: UpdateQuotationRequest,
        replacement: Option<Vec<LineItem>>,
    ) -> Result<Quotation> {
        let mut quotation = tx
            .find_quotation(user_id, quotation_id)
            .await?
            .ok_or_else(|| not_found(quotation_id))?;

        if let Some(quotation_no) = request.quotation_no {
            ensure_number_free(tx, quotation_no, Some(quotation_id)).await?;
            quotation.quotation_no = quotation_no;
        }
        if let Some(party_id) = request.party_id {
            quotation.party_id = party_id;
        }
        if let Some(date) = request.date {
            quotation.date = date;
        }
        if let Some(subject) = request.subject {
            quotation.subject = subject.trim().to_string();
        }
        if let Some(terms) = request.terms {
            quotation.terms = terms;
        }
        quotation.updated_at = Utc::now();

        tx.update_quotation(&quotation).await?;

        if let Some(items) = replacement {
            tx.delete_line_items(DocumentKind::Quotation, quotation_id)
                .await?;
            tx.insert_line_items(DocumentKind::Quotation, quotation_id, &items)
                .await?;
        }

        let mut stored = tx
            .find_quotation(user_id, quotation_id)
            .await?
            .ok_or_else(|| not_found(quotation_id))?;

        recompute_and_store(tx, &mut stored).await?;
        Ok(stored)
    }

    pub async fn get_quotation(&self, user_id: i64, quotation_id: i64) -> Result<Quotation> {
        self.store
            .find_quotation(user_id, quotation_id)
            .await?
            .ok_or_else(|| not_found(quotation_id))
    }

    pub async fn list_quotations(
        &self,
        user_id: i64,
        filter: &DocumentFilter,
    ) -> Result<Page<Quotation>> {
        self.store.list_quotations(user_id, filter).await
    }

    pub async fn delete_quotation(&self, user_id: i64, quotation_id: i64) -> Result<()> {
        let mut tx = self.store.begin().await?;

        let result = match tx.find_quotation(user_id, quotation_id).await {
            Ok(Some(_)) => tx.delete_quotation(quotation_id).await.map(|_| ()),
            Ok(None) => Err(not_found(quotation_id)),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                tx.commit().await?;
                tracing::info!(user_id, quotation_id, "Quotation deleted");
                Ok(())
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }
}
