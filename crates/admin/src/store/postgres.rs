use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pharma_common::error::AppError;
use pharma_common::types::{UserRole, normalize_address};

use super::RoleStore;

/// `RoleStore` backed by the PostgreSQL `users` table.
#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn list_all(&self) -> Result<Vec<UserRole>, AppError> {
        let users: Vec<UserRole> = sqlx::query_as(
            "SELECT address, role, assigned_at FROM users ORDER BY assigned_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users
            .into_iter()
            .map(|user| UserRole {
                address: normalize_address(&user.address),
                ..user
            })
            .collect())
    }

    async fn upsert(
        &self,
        address: &str,
        role: &str,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (address, role, assigned_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (address) DO UPDATE SET role = $2, assigned_at = $3
            "#,
        )
        .bind(address)
        .bind(role)
        .bind(assigned_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(address, role, "User role upserted");
        Ok(())
    }

    async fn delete(&self, address: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE address = $1")
            .bind(address)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(address, "User role deleted");
        }

        Ok(deleted)
    }
}
