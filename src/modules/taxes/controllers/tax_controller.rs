//! Stateless GST calculator endpoint

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_amount;
use crate::core::{format_amount, AppError, Result};
use crate::modules::taxes::models::{GstRates, LineTotals};
use crate::modules::taxes::services::validate_line_amounts;

#[derive(Debug, Deserialize)]
pub struct LineTotalsRequest {
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub cgst: Decimal,
    #[serde(default)]
    pub sgst: Decimal,
    #[serde(default)]
    pub igst: Decimal,
}

impl LineTotalsRequest {
    fn validate(&self) -> Result<(GstRates, LineTotals)> {
        if self.quantity <= 0 {
            return Err(AppError::validation("quantity must be greater than 0"));
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(AppError::validation("unit_price must be greater than 0"));
        }
        validate_amount("unit_price", self.unit_price).map_err(AppError::validation)?;

        let rates = GstRates::new(self.cgst, self.sgst, self.igst);
        rates.validate()?;
        let totals = validate_line_amounts(self.quantity, self.unit_price, &rates)?;
        Ok((rates, totals))
    }
}

/// Rounded breakdown, amounts as two-decimal strings
#[derive(Debug, Serialize)]
pub struct LineTotalsResponse {
    pub gst_rate: String,
    pub amount_before_gst: String,
    pub cgst_amount: String,
    pub sgst_amount: String,
    pub igst_amount: String,
    pub gst_amount: String,
    pub amount_after_gst: String,
}

impl LineTotalsResponse {
    fn new(rates: &GstRates, totals: &LineTotals) -> Self {
        Self {
            gst_rate: format_amount(rates.total_rate()),
            amount_before_gst: format_amount(totals.pre_tax_amount),
            cgst_amount: format_amount(totals.cgst_amount),
            sgst_amount: format_amount(totals.sgst_amount),
            igst_amount: format_amount(totals.igst_amount),
            gst_amount: format_amount(totals.total_tax),
            amount_after_gst: format_amount(totals.post_tax_amount),
        }
    }
}

/// Compute line totals
///
/// POST /taxes/line-totals
pub async fn line_totals(request: web::Json<LineTotalsRequest>) -> Result<HttpResponse> {
    let (rates, totals) = request.validate()?;

    Ok(HttpResponse::Ok().json(LineTotalsResponse::new(&rates, &totals)))
}

/// Configure tax routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/taxes").route("/line-totals", web::post().to(line_totals)));
}
