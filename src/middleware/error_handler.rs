//! Extractor error handlers.
//!
//! Malformed JSON bodies, query strings and path segments are reported with
//! the same `{"error": {...}}` body as every other validation failure.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::AppError;

/// Log a rejected request at the appropriate level
pub fn log_error(req: &HttpRequest, error: &AppError) {
    if error.is_client_error() {
        tracing::debug!(path = %req.path(), error = %error, "Request rejected");
    } else {
        tracing::error!(path = %req.path(), error = %error, "Request failed");
    }
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    let error = AppError::validation(format!("Invalid JSON body: {}", err));
    log_error(req, &error);
    error.into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    let error = AppError::validation(format!("Invalid query string: {}", err));
    log_error(req, &error);
    error.into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    let error = AppError::validation(format!("Invalid path parameter: {}", err));
    log_error(req, &error);
    error.into()
}

/// Registers the handlers on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
