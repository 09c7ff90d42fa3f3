//! Address registry: the off-chain `users` table mapping wallet addresses to roles.
//!
//! The table is the application's view of "who has which role". It is written
//! before the contract is updated and is never reconciled against chain state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pharma_common::error::AppError;
use pharma_common::types::UserRole;

pub mod memory;
pub mod postgres;

pub use memory::MemoryRoleStore;
pub use postgres::PgRoleStore;

/// Storage backend for user-role records.
///
/// Callers pass already-normalized addresses; implementations lowercase on read
/// so rows written by other tools still come back canonical.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// All records, most recently assigned first.
    async fn list_all(&self) -> Result<Vec<UserRole>, AppError>;

    /// Insert a record or overwrite the role and timestamp of an existing one.
    async fn upsert(
        &self,
        address: &str,
        role: &str,
        assigned_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Delete a record. Returns `false` when no row matched, which is not an error.
    async fn delete(&self, address: &str) -> Result<bool, AppError>;
}
