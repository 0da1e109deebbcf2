use serde::Serialize;

/// A client of the tenant, as needed for billing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Party {
    pub id: i64,
    /// Owning tenant
    pub user_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub gstin: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
}
