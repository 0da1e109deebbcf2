use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::middleware::TenantId;
use crate::modules::documents::models::{DocumentKind, DocumentListQuery, DocumentTotalsResponse};
use crate::modules::documents::services::TotalsService;
use crate::modules::quotations::models::{
    CreateQuotationRequest, QuotationResponse, UpdateQuotationRequest,
};
use crate::modules::quotations::services::QuotationService;
use crate::modules::reports::controllers::PartySummaryQuery;
use crate::modules::reports::services::ReportService;

/// POST /quotations
pub async fn create_quotation(
    service: web::Data<Arc<QuotationService>>,
    tenant: TenantId,
    request: web::Json<CreateQuotationRequest>,
) -> Result<HttpResponse> {
    let quotation = service
        .create_quotation(tenant.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(QuotationResponse::from(&quotation)))
}

/// GET /quotations
pub async fn list_quotations(
    service: web::Data<Arc<QuotationService>>,
    tenant: TenantId,
    query: web::Query<DocumentListQuery>,
) -> Result<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = service.list_quotations(tenant.0, &filter).await?;
    Ok(HttpResponse::Ok().json(page.map(|quotation| QuotationResponse::summary(&quotation))))
}

/// GET /quotations/{id}
pub async fn get_quotation(
    service: web::Data<Arc<QuotationService>>,
    tenant: TenantId,
    quotation_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let quotation = service
        .get_quotation(tenant.0, quotation_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(QuotationResponse::from(&quotation)))
}

/// PUT /quotations/{id}
pub async fn update_quotation(
    service: web::Data<Arc<QuotationService>>,
    tenant: TenantId,
    quotation_id: web::Path<i64>,
    request: web::Json<UpdateQuotationRequest>,
) -> Result<HttpResponse> {
    let quotation = service
        .update_quotation(tenant.0, quotation_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(QuotationResponse::from(&quotation)))
}

/// DELETE /quotations/{id}
pub async fn delete_quotation(
    service: web::Data<Arc<QuotationService>>,
    tenant: TenantId,
    quotation_id: web::Path<i64>,
) -> Result<HttpResponse> {
    service
        .delete_quotation(tenant.0, quotation_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /quotations/{id}/recompute-totals
pub async fn recompute_totals(
    service: web::Data<Arc<TotalsService>>,
    tenant: TenantId,
    quotation_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let totals = service
        .recompute_document_totals(tenant.0, DocumentKind::Quotation, quotation_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(DocumentTotalsResponse::from(&totals)))
}

/// GET /quotations/party-summary?party_name=
pub async fn party_summary(
    service: web::Data<Arc<ReportService>>,
    tenant: TenantId,
    query: web::Query<PartySummaryQuery>,
) -> Result<HttpResponse> {
    let summary = service
        .party_summary(tenant.0, DocumentKind::Quotation, query.party_name.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotations")
            .route("", web::post().to(create_quotation))
            .route("", web::get().to(list_quotations))
            .route("/party-summary", web::get().to(party_summary))
            .route("/{id}", web::get().to(get_quotation))
            .route("/{id}", web::put().to(update_quotation))
            .route("/{id}", web::delete().to(delete_quotation))
            .route("/{id}/recompute-totals", web::post().to(recompute_totals)),
    );
}
