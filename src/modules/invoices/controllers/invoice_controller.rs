use std::sync::Arc;

use actix_web::{web, HttpResponse};
use crate::core::Result;
use crate::middleware::TenantId;
use crate::modules::documents::models::{DocumentKind, DocumentListQuery, DocumentTotalsResponse};
use crate::modules::documents::services::TotalsService;
use crate::modules::invoices::models::{
    ConvertQuotationRequest, CreateInvoiceRequest, InvoiceResponse, UpdateInvoiceRequest,
};
use crate::modules::invoices::services::InvoiceService;
use crate::modules::reports::controllers::PartySummaryQuery;
use crate::modules::reports::services::ReportService;

/// Create invoice
///
/// POST /invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse> {
    let invoice = service.create_invoice(tenant.0, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(InvoiceResponse::from(&invoice)))
}

/// List invoices
///
/// GET /invoices?party=&bill_no=&date_after=&ordering=-date&limit=20&offset=0
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    query: web::Query<DocumentListQuery>,
) -> Result<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let page = service.list_invoices(tenant.0, &filter).await?;
    Ok(HttpResponse::Ok().json(page.map(|invoice| InvoiceResponse::summary(&invoice))))
}

/// Get invoice with line items
///
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    invoice_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let invoice = service.get_invoice(tenant.0, invoice_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(&invoice)))
}

/// Update invoice
///
/// PUT /invoices/{id}
pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    invoice_id: web::Path<i64>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse> {
    let invoice = service
        .update_invoice(tenant.0, invoice_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(&invoice)))
}

/// Delete invoice
///
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    invoice_id: web::Path<i64>,
) -> Result<HttpResponse> {
    service.delete_invoice(tenant.0, invoice_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Convert quotation to invoice
///
/// POST /invoices/create-from-quotation
pub async fn create_from_quotation(
    service: web::Data<Arc<InvoiceService>>,
    tenant: TenantId,
    request: web::Json<ConvertQuotationRequest>,
) -> Result<HttpResponse> {
    let invoice = service.convert_quotation(tenant.0, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(InvoiceResponse::from(&invoice)))
}

/// Recompute cached totals from the line items
///
/// POST /invoices/{id}/recompute-totals
pub async fn recompute_totals(
    service: web::Data<Arc<TotalsService>>,
    tenant: TenantId,
    invoice_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let totals = service
        .recompute_document_totals(tenant.0, DocumentKind::Invoice, invoice_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(DocumentTotalsResponse::from(&totals)))
}

/// Line item totals across every invoice of one party
///
/// GET /invoices/party-summary?party_name=
pub async fn party_summary(
    service: web::Data<Arc<ReportService>>,
    tenant: TenantId,
    query: web::Query<PartySummaryQuery>,
) -> Result<HttpResponse> {
    let summary = service
        .party_summary(tenant.0, DocumentKind::Invoice, query.party_name.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/party-summary", web::get().to(party_summary))
            .route("/create-from-quotation", web::post().to(create_from_quotation))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice))
            .route("/{id}/recompute-totals", web::post().to(recompute_totals)),
    );
}
