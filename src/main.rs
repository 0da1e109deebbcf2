use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gstbill::config::Config;
use gstbill::documents::{DocumentStore, MySqlDocumentStore, TotalsService};
use gstbill::invoices::{InvoiceService, InvoiceSettings};
use gstbill::middleware::{ApiKeyAuth, RateLimiter, RequestId};
use gstbill::modules::parties::{MySqlPartyDirectory, PartyDirectory};
use gstbill::quotations::QuotationService;
use gstbill::reports::{MySqlReportRepository, ReportRepository, ReportService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gstbill={},actix_web=info", config.app.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(env = %config.app.env, "Starting gstbill");
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        "Database pool initialized and migrations applied"
    );

    let clock = config.reporting_clock()?;
    let store: Arc<dyn DocumentStore> = Arc::new(MySqlDocumentStore::new(db_pool.clone()));
    let parties: Arc<dyn PartyDirectory> = Arc::new(MySqlPartyDirectory::new(db_pool.clone()));
    let reports: Arc<dyn ReportRepository> = Arc::new(MySqlReportRepository::new(db_pool.clone()));

    let invoice_service = Arc::new(InvoiceService::new(
        store.clone(),
        parties.clone(),
        InvoiceSettings {
            number_prefix: config.app.invoice_number_prefix.clone(),
            default_terms: config.app.default_invoice_terms.clone(),
        },
        clock,
    ));
    let quotation_service = Arc::new(QuotationService::new(
        store.clone(),
        parties.clone(),
        config.app.default_quotation_terms.clone(),
        clock,
    ));
    let totals_service = Arc::new(TotalsService::new(store));
    let report_service = Arc::new(ReportService::new(reports, parties));

    let rate_limit = config.security.rate_limit_per_minute;
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(clock))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(quotation_service.clone()))
            .app_data(web::Data::new(totals_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .configure(gstbill::modules::configure)
            .wrap(ApiKeyAuth::new(db_pool.clone()))
            .wrap(RateLimiter::new(rate_limit))
            .wrap(RequestId)
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(TracingLogger::default())
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
