use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::core::{AppError, Result};

/// MySQL connection settings.
///
/// Sessions run in UTC with `utf8mb4`; document dates are plain `DATE`
/// columns, so only the audit timestamps depend on the session zone.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle
    pub pool_size: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?;

        Ok(DatabaseConfig {
            url,
            pool_size: parse_var("DATABASE_POOL_SIZE", 10)?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 20)?,
            acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn connect_options(&self) -> Result<MySqlConnectOptions> {
        let options = MySqlConnectOptions::from_str(&self.url)
            .map_err(|e| AppError::Configuration(format!("Invalid DATABASE_URL: {}", e)))?;

        Ok(options.charset("utf8mb4").timezone(Some("+00:00".to_string())))
    }

    pub async fn create_pool(&self) -> Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(self.connect_options()?)
            .await?;

        tracing::debug!(
            min = self.pool_size,
            max = self.max_connections,
            "MySQL pool connected"
        );

        Ok(pool)
    }
}

/// Round trip to the database, used by the readiness probe
pub async fn ping(pool: &MySqlPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
