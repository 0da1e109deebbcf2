use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Paths served without an API key
const PUBLIC_PATHS: [&str; 2] = ["/health", "/ready"];

/// Account that owns the request, set by [`ApiKeyAuth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantId(pub i64);

impl FromRequest for TenantId {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<TenantId>()
                .copied()
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing tenant context"))),
        )
    }
}

/// API Key authentication middleware
pub struct ApiKeyAuth {
    pool: MySqlPool,
}

impl ApiKeyAuth {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    pool: MySqlPool,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?;

            let tenant_id = lookup_tenant(&pool, &api_key).await.map_err(Error::from)?;

            tracing::debug!(user_id = tenant_id.0, path = %req.path(), "Request authenticated");
            req.extensions_mut().insert(tenant_id);

            svc.call(req).await
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: i64,
    account_id: i64,
}

async fn lookup_tenant(pool: &MySqlPool, api_key: &str) -> crate::core::Result<TenantId> {
    let record = sqlx::query_as::<_, ApiKeyRow>(
        r#"
        SELECT id, account_id
        FROM api_keys
        WHERE key_hash = ? AND is_active = TRUE
        LIMIT 1
        "#,
    )
    .bind(hash_api_key(api_key))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    // Best effort; a failed timestamp write does not reject the request
    if let Err(err) = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = ?")
        .bind(record.id)
        .execute(pool)
        .await
    {
        tracing::warn!(api_key_id = record.id, error = %err, "Failed to record API key use");
    }

    Ok(TenantId(record.account_id))
}

/// Hex-encoded SHA-256 digest stored in `api_keys.key_hash`
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}
