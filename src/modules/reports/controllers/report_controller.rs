use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{AppError, ReportingClock, Result};
use crate::middleware::TenantId;
use crate::modules::reports::models::{parse_flag, DateRange, DocumentQuery};
use crate::modules::reports::services::ReportService;

/// Date window and paid filter shared by the dashboard endpoints.
///
/// Dates are YYYY-MM-DD and must be given together.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub is_paid: Option<String>,
}

impl ReportQuery {
    fn range(&self) -> Result<Option<DateRange>> {
        DateRange::from_params(self.from_date.as_deref(), self.to_date.as_deref())
    }

    fn document_query(&self) -> Result<DocumentQuery> {
        Ok(DocumentQuery {
            range: self.range()?,
            is_paid: parse_flag("is_paid", self.is_paid.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthlyTaxQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Exact party name for the per-party document summaries
#[derive(Debug, Deserialize)]
pub struct PartySummaryQuery {
    pub party_name: Option<String>,
}

fn data<T: serde::Serialize>(value: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "data": value }))
}

/// GET /reports/dashboard
pub async fn dashboard_summary(
    service: web::Data<Arc<ReportService>>,
    tenant: TenantId,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let summary = service
        .dashboard_summary(tenant.0, &query.document_query()?)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// GET /reports/monthly-counts
pub async fn monthly_counts(
    service: web::Data<Arc<ReportService>>,
    clock: web::Data<ReportingClock>,
    tenant: TenantId,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let counts = service
        .monthly_counts(tenant.0, &query.document_query()?, clock.today())
        .await?;
    Ok(data(counts))
}

/// GET /reports/monthly-amounts
pub async fn monthly_amounts(
    service: web::Data<Arc<ReportService>>,
    clock: web::Data<ReportingClock>,
    tenant: TenantId,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let amounts = service
        .monthly_amounts(tenant.0, &query.document_query()?, clock.today())
        .await?;
    Ok(data(amounts))
}

/// GET /reports/top-clients
pub async fn top_clients(
    service: web::Data<Arc<ReportService>>,
    clock: web::Data<ReportingClock>,
    tenant: TenantId,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let clients = service
        .top_clients(tenant.0, &query.document_query()?, clock.today())
        .await?;
    Ok(data(clients))
}

/// GET /reports/paid-unpaid
pub async fn paid_unpaid(
    service: web::Data<Arc<ReportService>>,
    clock: web::Data<ReportingClock>,
    tenant: TenantId,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let split = service
        .paid_unpaid(tenant.0, &query.document_query()?, clock.today())
        .await?;
    Ok(HttpResponse::Ok().json(split))
}

/// GET /reports/monthly-tax?year=2025&month=4
pub async fn monthly_tax_report(
    service: web::Data<Arc<ReportService>>,
    tenant: TenantId,
    query: web::Query<MonthlyTaxQuery>,
) -> Result<HttpResponse> {
    let (year, month) = match (query.year, query.month) {
        (Some(year), Some(month)) => (year, month),
        _ => return Err(AppError::validation("year and month are required")),
    };

    let report = service.monthly_tax_report(tenant.0, year, month).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(dashboard_summary))
            .route("/monthly-counts", web::get().to(monthly_counts))
            .route("/monthly-amounts", web::get().to(monthly_amounts))
            .route("/top-clients", web::get().to(top_clients))
            .route("/paid-unpaid", web::get().to(paid_unpaid))
            .route("/monthly-tax", web::get().to(monthly_tax_report)),
    );
}
