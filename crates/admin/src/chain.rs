//! PharmaNFT contract client.
//!
//! Mirrors an off-chain role assignment to the `PharmaNFT` contract on the
//! PharmaDNA chain. Configuration problems (missing key, unset contract
//! address, no bytecode at the address) are reported before any transaction
//! is signed. Broadcasting, nonce selection and gas estimation are left to the
//! alloy provider fillers; nothing here retries.

use std::str::FromStr;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use thiserror::Error;

use pharma_common::config::AppConfig;
use pharma_common::types::Role;

// Only the two methods the admin backend touches.
sol! {
    #[sol(rpc)]
    interface IPharmaNFT {
        /// Grants `role` (1..=4) to `account`. Owner only.
        function assignRole(address account, uint8 role) external;

        /// Current role code of `account`, 0 when none.
        function roles(address account) external view returns (uint8);
    }
}

/// Operator-facing remediation hints attached to every sync failure.
pub const SYNC_HINTS: [&str; 3] = [
    "Check PHARMA_NFT_ADDRESS is correct on PharmaDNA",
    "Ensure OWNER_PRIVATE_KEY has PDNA balance and is contract owner",
    "Check PharmaDNA RPC endpoint is working",
];

/// Minimum length of a plausible contract address string.
const MIN_CONTRACT_ADDRESS_LEN: usize = 10;

/// Reasons an on-chain role assignment did not happen.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("OWNER_PRIVATE_KEY not set")]
    MissingCredential,

    #[error("OWNER_PRIVATE_KEY is not a valid private key: {0}")]
    InvalidCredential(String),

    #[error("PHARMA_NFT_ADDRESS is not configured")]
    ContractNotConfigured,

    #[error("PHARMA_NFT_ADDRESS is not a valid address: {0}")]
    InvalidContractAddress(String),

    #[error("No contract code at PHARMA_NFT_ADDRESS: {0}")]
    NoContractCode(String),

    #[error("Invalid role")]
    InvalidRole(String),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("{0}")]
    Rpc(String),
}

impl From<pharma_common::types::InvalidRole> for SyncError {
    fn from(err: pharma_common::types::InvalidRole) -> Self {
        SyncError::InvalidRole(err.0)
    }
}

/// Confirmation of a mined role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReceipt {
    pub tx_hash: String,
}

/// Writes role assignments to the chain.
#[async_trait]
pub trait RoleSync: Send + Sync {
    /// Assign `role` to `address` on-chain and wait for the transaction to be mined.
    async fn assign_role_on_chain(&self, address: &str, role: Role)
    -> Result<SyncReceipt, SyncError>;
}

/// `RoleSync` that calls `assignRole` on the deployed PharmaNFT contract.
#[derive(Clone)]
pub struct ContractRoleSync {
    rpc_url: String,
    contract_address: Option<String>,
    operator_key: Option<String>,
}

impl ContractRoleSync {
    pub fn new(
        rpc_url: impl Into<String>,
        contract_address: Option<String>,
        operator_key: Option<String>,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract_address,
            operator_key,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rpc_url.clone(),
            config.contract_address.clone(),
            config.owner_private_key.clone(),
        )
    }

    fn signer(&self) -> Result<PrivateKeySigner, SyncError> {
        let key = self
            .operator_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SyncError::MissingCredential)?;

        // Never echo the key itself.
        PrivateKeySigner::from_str(key)
            .map_err(|e| SyncError::InvalidCredential(e.to_string()))
    }

    fn contract_address(&self) -> Result<Address, SyncError> {
        let raw = self.contract_address.as_deref().unwrap_or_default();
        if !is_plausible_contract_address(raw) {
            return Err(SyncError::ContractNotConfigured);
        }
        Address::from_str(raw).map_err(|_| SyncError::InvalidContractAddress(raw.to_string()))
    }
}

/// Cheap shape check on a configured contract address before any RPC is made.
pub fn is_plausible_contract_address(raw: &str) -> bool {
    !raw.is_empty() && raw != "0x" && raw.len() >= MIN_CONTRACT_ADDRESS_LEN
}

#[async_trait]
impl RoleSync for ContractRoleSync {
    async fn assign_role_on_chain(
        &self,
        address: &str,
        role: Role,
    ) -> Result<SyncReceipt, SyncError> {
        let signer = self.signer()?;
        let contract_address = self.contract_address()?;
        let account = Address::from_str(address)
            .map_err(|_| SyncError::InvalidAddress(address.to_string()))?;
        let url: Url = self
            .rpc_url
            .parse()
            .map_err(|_| SyncError::InvalidRpcUrl(self.rpc_url.clone()))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        let code = provider
            .get_code_at(contract_address)
            .await
            .map_err(|e| SyncError::Rpc(e.to_string()))?;
        if code.is_empty() {
            return Err(SyncError::NoContractCode(
                self.contract_address.clone().unwrap_or_default(),
            ));
        }

        let contract = IPharmaNFT::new(contract_address, provider.clone());

        tracing::info!(
            address = %account,
            role = %role,
            role_code = role.code(),
            "Assigning role on contract"
        );

        let pending = contract
            .assignRole(account, role.code())
            .send()
            .await
            .map_err(|e| SyncError::Rpc(e.to_string()))?;
        let tx_hash = format!("{:#x}", pending.tx_hash());
        tracing::info!(tx_hash = %tx_hash, "Role assignment transaction sent");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| SyncError::Rpc(e.to_string()))?;
        if !receipt.status() {
            return Err(SyncError::Reverted(tx_hash));
        }

        // Read-back is diagnostic only; it never changes the outcome.
        match contract.roles(account).call().await {
            Ok(code) => tracing::info!(
                address = %account,
                role_code = code,
                role = ?Role::from_code(code),
                "Role on chain after assign"
            ),
            Err(e) => tracing::warn!(
                address = %account,
                error = %e,
                "Failed to read back role from contract"
            ),
        }

        Ok(SyncReceipt { tx_hash })
    }
}
