use std::net::SocketAddr;

/// Default JSON-RPC endpoint of the PharmaDNA chain.
pub const DEFAULT_RPC_URL: &str = "https://pharmadna-2759821881746000-1.jsonrpc.sagarpc.io";

/// Global application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 10)
    pub db_max_connections: u32,

    /// PharmaDNA JSON-RPC endpoint
    pub rpc_url: String,

    /// Address of the deployed PharmaNFT role contract
    pub contract_address: Option<String>,

    /// Operator key used to sign `assignRole` transactions
    pub owner_private_key: Option<String>,

    /// Socket address the API server binds to (default: 0.0.0.0:3000)
    pub listen_addr: SocketAddr,

    /// Reject unknown role labels before touching the users table (default: false)
    pub validate_role_before_write: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: non_empty("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            rpc_url: non_empty("PHARMADNA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            contract_address: non_empty("PHARMA_NFT_ADDRESS"),
            owner_private_key: non_empty("OWNER_PRIVATE_KEY"),
            listen_addr: non_empty("LISTEN_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("LISTEN_ADDR must be a socket address like 0.0.0.0:3000"))?,
            validate_role_before_write: non_empty("VALIDATE_ROLE_BEFORE_WRITE")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("VALIDATE_ROLE_BEFORE_WRITE must be true or false"))?,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("db_max_connections", &self.db_max_connections)
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field(
                "owner_private_key",
                &self.owner_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("listen_addr", &self.listen_addr)
            .field("validate_role_before_write", &self.validate_role_before_write)
            .finish()
    }
}
