use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::documents::models::{
    DocumentKind, DocumentTotals, DocumentTotalsResponse, LineItem, LineItemRequest,
    LineItemResponse,
};
use crate::modules::documents::services::TaxableDocument;

#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    pub id: i64,
    pub party_id: i64,
    /// Quotation number, unique across all tenants
    pub quotation_no: i64,
    pub date: NaiveDate,
    pub subject: String,
    pub terms: String,
    pub totals: DocumentTotals,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaxableDocument for Quotation {
    const KIND: DocumentKind = DocumentKind::Quotation;

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

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuotationRequest {
    pub party_id: i64,
    pub quotation_no: i64,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

/// Partial update; a non-empty `line_items` replaces all existing items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuotationRequest {
    pub party_id: Option<i64>,
    pub quotation_no: Option<i64>,
    pub date: Option<NaiveDate>,
    pub subject: Option<String>,
    pub terms: Option<String>,
    pub line_items: Option<Vec<LineItemRequest>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuotationResponse {
    pub id: i64,
    pub party_id: i64,
    pub quotation_no: i64,
    pub date: NaiveDate,
    pub subject: String,
    pub terms: String,
    #[serde(flatten)]
    pub totals: DocumentTotalsResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItemResponse>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuotationResponse {
    pub fn summary(quotation: &Quotation) -> Self {
        Self {
            id: quotation.id,
            party_id: quotation.party_id,
            quotation_no: quotation.quotation_no,
            date: quotation.date,
            subject: quotation.subject.clone(),
            terms: quotation.terms.clone(),
            totals: DocumentTotalsResponse::from(&quotation.totals),
            line_items: None,
            created_at: quotation.created_at,
            updated_at: quotation.updated_at,
        }
    }
}

impl From<&Quotation> for QuotationResponse {
    fn from(quotation: &Quotation) -> Self {
        Self {
            line_items: Some(
                quotation
                    .line_items
                    .iter()
                    .map(LineItemResponse::from)
                    .collect(),
            ),
            ..Self::summary(quotation)
        }
    }
}
