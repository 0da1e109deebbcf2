pub mod documents;
pub mod health;
pub mod invoices;
pub mod parties;
pub mod quotations;
pub mod reports;
pub mod taxes;

use actix_web::web;

/// Registers every HTTP route; shared state is added by the caller
pub fn configure(cfg: &mut web::ServiceConfig) {
    crate::middleware::error_handler::configure(cfg);
    health::configure(cfg);
    taxes::controllers::configure(cfg);
    invoices::controllers::configure(cfg);
    quotations::controllers::configure(cfg);
    reports::controllers::configure(cfg);
}
