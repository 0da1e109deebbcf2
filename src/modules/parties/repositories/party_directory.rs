use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::parties::models::Party;

/// Read access to the tenant's parties
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    /// Party by id, or None when it does not exist or belongs to another tenant
    async fn find_for_tenant(&self, user_id: i64, party_id: i64) -> Result<Option<Party>>;

    async fn count_for_tenant(&self, user_id: i64) -> Result<i64>;
}

pub struct MySqlPartyDirectory {
    pool: MySqlPool,
}

impl MySqlPartyDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartyDirectory for MySqlPartyDirectory {
    async fn find_for_tenant(&self, user_id: i64, party_id: i64) -> Result<Option<Party>> {
        let party = sqlx::query_as::<_, Party>(
            r#"
            SELECT id, user_id, name, address, city, gstin, state, state_code
            FROM parties
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(party)
    }

    async fn count_for_tenant(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parties WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
