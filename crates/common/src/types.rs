use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supply-chain roles understood by the PharmaNFT contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manufacturer,
    Distributor,
    Pharmacy,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Manufacturer,
        Role::Distributor,
        Role::Pharmacy,
        Role::Admin,
    ];

    /// Integer code the contract stores for this role.
    pub fn code(self) -> u8 {
        match self {
            Role::Manufacturer => 1,
            Role::Distributor => 2,
            Role::Pharmacy => 3,
            Role::Admin => 4,
        }
    }

    /// Reverse of [`Role::code`]. Code 0 (no role) and unknown codes map to `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manufacturer => "MANUFACTURER",
            Role::Distributor => "DISTRIBUTOR",
            Role::Pharmacy => "PHARMACY",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role label is not one of the four known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role")]
pub struct InvalidRole(pub String);

impl std::str::FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| InvalidRole(s.to_string()))
    }
}

/// A wallet address and the role assigned to it off-chain.
///
/// `role` is kept as the raw label: the users table does not constrain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRole {
    pub address: String,
    pub role: String,
    #[serde(rename = "assignedAt")]
    pub assigned_at: DateTime<Utc>,
}

/// Canonical store key for a wallet address.
pub fn normalize_address(address: &str) -> String {
    address.to_lowercase()
}
