//! In-memory `RoleStore` for tests and local runs without PostgreSQL.
//!
//! Not durable: all records are lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use pharma_common::error::AppError;
use pharma_common::types::{UserRole, normalize_address};

use super::RoleStore;

#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    users: RwLock<HashMap<String, UserRole>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single record by its stored key.
    pub async fn get(&self, address: &str) -> Option<UserRole> {
        self.users.read().await.get(address).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn list_all(&self) -> Result<Vec<UserRole>, AppError> {
        let users = self.users.read().await;
        let mut list: Vec<UserRole> = users
            .values()
            .map(|user| UserRole {
                address: normalize_address(&user.address),
                ..user.clone()
            })
            .collect();
        list.sort_by(|a, b| {
            b.assigned_at
                .cmp(&a.assigned_at)
                .then_with(|| a.address.cmp(&b.address))
        });
        Ok(list)
    }

    async fn upsert(
        &self,
        address: &str,
        role: &str,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.users.write().await.insert(
            address.to_string(),
            UserRole {
                address: address.to_string(),
                role: role.to_string(),
                assigned_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, address: &str) -> Result<bool, AppError> {
        Ok(self.users.write().await.remove(address).is_some())
    }
}
