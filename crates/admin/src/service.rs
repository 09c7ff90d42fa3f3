//! Admin service: assigns and removes wallet roles.
//!
//! Assignment is a dual-write: the users table is upserted first, then the
//! role is pushed to the contract. A failed chain step leaves the table row in
//! place (no compensation), so the two can diverge until the next successful
//! assignment for that address. Removal only touches the table.

use std::sync::Arc;

use chrono::Utc;

use pharma_common::error::ServiceFailure;
use pharma_common::types::{Role, UserRole, normalize_address};

use crate::chain::{RoleSync, SYNC_HINTS, SyncError};
use crate::store::RoleStore;

const SYNC_FAILED: &str = "Error syncing role to contract";
const REMOVE_FAILED: &str = "Error removing role";

/// Orchestrates the role store and the on-chain role contract.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn RoleStore>,
    chain: Arc<dyn RoleSync>,
    validate_role_before_write: bool,
}

impl AdminService {
    pub fn new(store: Arc<dyn RoleStore>, chain: Arc<dyn RoleSync>) -> Self {
        Self {
            store,
            chain,
            validate_role_before_write: false,
        }
    }

    /// Reject unknown role labels before the store is written.
    ///
    /// Off by default: the default path upserts whatever label it is given and
    /// only the chain step rejects it.
    pub fn with_role_validation_before_write(mut self, enabled: bool) -> Self {
        self.validate_role_before_write = enabled;
        self
    }

    /// List all user roles. Store failures are logged and yield an empty list.
    pub async fn get_users(&self) -> Vec<UserRole> {
        match self.store.list_all().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching users");
                Vec::new()
            }
        }
    }

    /// Record `role` for `address` and mirror it to the contract.
    pub async fn assign_role(&self, address: &str, role: &str) -> Result<(), ServiceFailure> {
        let address = normalize_address(address);

        if self.validate_role_before_write {
            role.parse::<Role>()
                .map_err(|e| sync_failure(&address, role, SyncError::from(e).to_string()))?;
        }

        self.store
            .upsert(&address, role, Utc::now())
            .await
            .map_err(|e| sync_failure(&address, role, e.to_string()))?;

        // The row is committed from here on; failures below do not undo it.
        let parsed = role.parse::<Role>().map_err(SyncError::from);
        let result = match parsed {
            Ok(parsed) => self.chain.assign_role_on_chain(&address, parsed).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(receipt) => {
                tracing::info!(
                    address = %address,
                    role,
                    tx_hash = %receipt.tx_hash,
                    "Role assigned and synced to contract"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    address = %address,
                    role,
                    "Role stored off-chain but not synced to contract"
                );
                Err(sync_failure(&address, role, e.to_string()))
            }
        }
    }

    /// Delete the stored role for `address`. Nothing is revoked on-chain.
    pub async fn remove_role(&self, address: &str) -> Result<(), ServiceFailure> {
        let address = normalize_address(address);

        match self.store.delete(&address).await {
            Ok(deleted) => {
                tracing::info!(address = %address, deleted, "Role removed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Error removing role");
                Err(ServiceFailure::new(REMOVE_FAILED))
            }
        }
    }
}

fn sync_failure(address: &str, role: &str, detail: String) -> ServiceFailure {
    tracing::error!(address, role, detail = %detail, "Error assigning role");
    ServiceFailure::new(SYNC_FAILED)
        .with_detail(detail)
        .with_hints(SYNC_HINTS)
}
