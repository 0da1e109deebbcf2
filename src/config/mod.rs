use crate::core::{AppError, ReportingClock, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::{ping, DatabaseConfig};
pub use server::ServerConfig;

/// Largest UTC offset accepted for the reporting clock, in minutes
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

const DEFAULT_INVOICE_TERMS: &str = "All disputes subject to local jurisdiction. \
Goods once sold will not be taken back or exchanged. \
Interest @24% will be charged if bills are not paid on presentation. E.& O.E.";

const DEFAULT_QUOTATION_TERMS: &str = "1. 100% advance 2. Service within 7 days after order \
confirmation 3. Quoted rate is valid for 30 days from the quotation date";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Prepended to generated invoice numbers
    pub invoice_number_prefix: String,
    /// Minutes east of UTC used to decide "today" for financial-year reports
    pub reporting_utc_offset_minutes: i32,
    pub default_invoice_terms: String,
    pub default_quotation_terms: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                invoice_number_prefix: env::var("INVOICE_NUMBER_PREFIX").unwrap_or_default(),
                reporting_utc_offset_minutes: env::var("REPORTING_UTC_OFFSET_MINUTES")
                    .unwrap_or_else(|_| "330".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration(
                            "Invalid REPORTING_UTC_OFFSET_MINUTES".to_string(),
                        )
                    })?,
                default_invoice_terms: env::var("DEFAULT_INVOICE_TERMS")
                    .unwrap_or_else(|_| DEFAULT_INVOICE_TERMS.to_string()),
                default_quotation_terms: env::var("DEFAULT_QUOTATION_TERMS")
                    .unwrap_or_else(|_| DEFAULT_QUOTATION_TERMS.to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig {
                rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid RATE_LIMIT_PER_MINUTE".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size == 0 || self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool sizes must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.app.reporting_utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::Configuration(format!(
                "REPORTING_UTC_OFFSET_MINUTES must be within ±{}",
                MAX_UTC_OFFSET_MINUTES
            )));
        }

        Ok(())
    }

    /// Clock deciding the local date for reports
    pub fn reporting_clock(&self) -> Result<ReportingClock> {
        ReportingClock::from_offset_minutes(self.app.reporting_utc_offset_minutes).ok_or_else(
            || AppError::Configuration("Invalid REPORTING_UTC_OFFSET_MINUTES".to_string()),
        )
    }
}
