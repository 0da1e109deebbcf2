use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{format_amount, money::validate_amount, AppError, Result};
use crate::modules::documents::models::UnitType;
use crate::modules::taxes::models::GstRates;
use crate::modules::taxes::services::{compute_line_totals, validate_line_amounts};

/// A product or service line on an invoice or quotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row id, None until persisted
    pub id: Option<i64>,

    /// Owning invoice or quotation, None until attached
    pub document_id: Option<i64>,

    pub description: String,

    /// HSN/SAC classification code, stored as given
    pub hsn_code: Option<i32>,

    pub quantity: i32,

    pub unit_type: Option<UnitType>,

    pub unit_price: Decimal,

    pub rates: GstRates,
}

impl LineItem {
    /// Create a new line item with validation
    pub fn new(
        description: impl Into<String>,
        quantity: i32,
        unit_price: Decimal,
        rates: GstRates,
    ) -> Result<Self> {
        let item = Self {
            id: None,
            document_id: None,
            description: description.into(),
            hsn_code: None,
            quantity,
            unit_type: None,
            unit_price,
            rates,
        };

        item.validate()?;
        Ok(item)
    }

    pub fn with_hsn_code(mut self, hsn_code: i32) -> Self {
        self.hsn_code = Some(hsn_code);
        self
    }

    pub fn with_unit_type(mut self, unit_type: UnitType) -> Self {
        self.unit_type = Some(unit_type);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::validation("Line item description cannot be empty"));
        }

        if self.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Quantity must be greater than 0, got {}",
                self.quantity
            )));
        }

        if self.unit_price <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Unit price must be greater than 0, got {}",
                self.unit_price
            )));
        }

        validate_amount("Unit price", self.unit_price).map_err(AppError::Validation)?;
        self.rates.validate()?;
        validate_line_amounts(self.quantity, self.unit_price, &self.rates)?;
        Ok(())
    }

    /// Copy of this item detached from any document
    pub fn detached(&self) -> Self {
        Self {
            id: None,
            document_id: None,
            ..self.clone()
        }
    }
}

/// Line item as submitted by API clients
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub description: String,
    #[serde(default)]
    pub hsn_code: Option<i32>,
    pub quantity: i32,
    #[serde(default)]
    pub unit_type: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub cgst: Decimal,
    #[serde(default)]
    pub sgst: Decimal,
    #[serde(default)]
    pub igst: Decimal,
}

impl LineItemRequest {
    pub fn into_line_item(self) -> Result<LineItem> {
        let unit_type = match self.unit_type.as_deref() {
            Some(code) if !code.trim().is_empty() => Some(code.parse::<UnitType>()?),
            _ => None,
        };

        let mut item = LineItem::new(
            self.description,
            self.quantity,
            self.unit_price,
            GstRates::new(self.cgst, self.sgst, self.igst),
        )?;
        item.hsn_code = self.hsn_code;
        item.unit_type = unit_type;

        Ok(item)
    }
}

/// Validates a batch of requested line items
pub fn parse_line_items(requests: Vec<LineItemRequest>) -> Result<Vec<LineItem>> {
    requests
        .into_iter()
        .enumerate()
        .map(|(idx, request)| {
            request.into_line_item().map_err(|err| match err {
                AppError::Validation(msg) => {
                    AppError::Validation(format!("line_items[{}]: {}", idx, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Line item with its computed tax breakdown, amounts rounded to 2 places
#[derive(Debug, Clone, Serialize)]
pub struct LineItemResponse {
    pub id: Option<i64>,
    pub description: String,
    pub hsn_code: Option<i32>,
    pub quantity: i32,
    pub unit_type: Option<UnitType>,
    pub unit_price: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub gst_rate: String,
    pub cgst_amount: String,
    pub sgst_amount: String,
    pub igst_amount: String,
    pub gst_amount: String,
    pub amount_before_gst: String,
    pub amount_after_gst: String,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        let totals = compute_line_totals(item);

        Self {
            id: item.id,
            description: item.description.clone(),
            hsn_code: item.hsn_code,
            quantity: item.quantity,
            unit_type: item.unit_type,
            unit_price: format_amount(item.unit_price),
            cgst: format_amount(item.rates.cgst),
            sgst: format_amount(item.rates.sgst),
            igst: format_amount(item.rates.igst),
            gst_rate: format_amount(item.rates.total_rate()),
            cgst_amount: format_amount(totals.cgst_amount),
            sgst_amount: format_amount(totals.sgst_amount),
            igst_amount: format_amount(totals.igst_amount),
            gst_amount: format_amount(totals.total_tax),
            amount_before_gst: format_amount(totals.pre_tax_amount),
            amount_after_gst: format_amount(totals.post_tax_amount),
        }
    }
}
