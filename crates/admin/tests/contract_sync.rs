//! Integration tests for `ContractRoleSync` against a scripted JSON-RPC node.
//!
//! The node is a small Axum app on a random local port. It answers the calls
//! the alloy provider makes while checking code, filling, signing, sending,
//! waiting for the receipt and reading the role back. No real chain is needed:
//!
//! ```bash
//! cargo test -p pharma-admin --test contract_sync -- --nocapture
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use pharma_admin::chain::{ContractRoleSync, RoleSync, SyncError, SyncReceipt};
use pharma_common::types::Role;

// Anvil's first default account key; never holds real funds.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const CONTRACT: &str = "0xaa3f88a6b613985f3D97295D6BAAb6246c2699c6";
const WALLET: &str = "0x00000000000000000000000000000000000000a1";
const TX_HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

// ============================================================
// Scripted node
// ============================================================

struct MockNode {
    has_code: bool,
    tx_succeeds: bool,
    block_number: AtomicU64,
    calls: Mutex<Vec<String>>,
}

impl MockNode {
    fn new(has_code: bool, tx_succeeds: bool) -> Arc<Self> {
        Arc::new(Self {
            has_code,
            tx_succeeds,
            block_number: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn called(&self, method: &str) -> bool {
        self.calls().iter().any(|m| m == method)
    }

    fn answer(&self, request: &Value) -> Value {
        let id = request["id"].clone();
        let method = request["method"].as_str().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(method.clone());

        let result = match method.as_str() {
            "eth_chainId" => json!("0x7a69"),
            "eth_getCode" if self.has_code => json!("0x6080604052"),
            "eth_getCode" => json!("0x"),
            "eth_getTransactionCount" => json!("0x0"),
            "eth_estimateGas" => json!("0x186a0"),
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => json!("0x3b9aca00"),
            "eth_blobBaseFee" => json!("0x1"),
            "eth_feeHistory" => json!({
                "oldestBlock": "0x1",
                "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
                "gasUsedRatio": [0.5],
                "reward": [["0x3b9aca00"]]
            }),
            "eth_sendRawTransaction" => json!(TX_HASH),
            // Every poll sees a fresh block so confirmation watchers make progress.
            "eth_blockNumber" => {
                let n = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;
                json!(format!("{:#x}", n))
            }
            "eth_getBlockByNumber" => {
                let n = self.block_number.load(Ordering::SeqCst);
                block(n)
            }
            "eth_getTransactionReceipt" => receipt(self.tx_succeeds),
            // roles(account) -> 4 (ADMIN)
            "eth_call" => json!(format!("0x{:064x}", 4)),
            _ => {
                return json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32601, "message": format!("method not found: {}", method) }
                });
            }
        };

        json!({ "jsonrpc": "2.0", "id": id, "result": result })
    }
}

fn empty_bloom() -> String {
    format!("0x{}", "0".repeat(512))
}

fn block(number: u64) -> Value {
    json!({
        "hash": format!("0x{:064x}", number + 0x100),
        "parentHash": format!("0x{:064x}", number + 0xff),
        "sha3Uncles": ZERO_HASH,
        "miner": "0x0000000000000000000000000000000000000000",
        "stateRoot": ZERO_HASH,
        "transactionsRoot": ZERO_HASH,
        "receiptsRoot": ZERO_HASH,
        "logsBloom": empty_bloom(),
        "difficulty": "0x0",
        "number": format!("{:#x}", number),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "timestamp": format!("{:#x}", 1_700_000_000 + number),
        "extraData": "0x",
        "mixHash": ZERO_HASH,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x3b9aca00",
        "uncles": [],
        "transactions": [TX_HASH]
    })
}

fn receipt(success: bool) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": empty_bloom(),
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": format!("0x{:064x}", 0x101),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": CONTRACT.to_lowercase(),
        "contractAddress": null
    })
}

async fn rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    match request {
        Value::Array(batch) => Json(Value::Array(
            batch.iter().map(|req| node.answer(req)).collect(),
        )),
        single => Json(node.answer(&single)),
    }
}

/// Serve `node` on a random local port and return its URL.
async fn spawn_node(node: Arc<MockNode>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", post(rpc)).with_state(node);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn assign(url: &str, role: Role) -> Result<SyncReceipt, SyncError> {
    let sync = ContractRoleSync::new(
        url,
        Some(CONTRACT.to_string()),
        Some(TEST_KEY.to_string()),
    );
    tokio::time::timeout(
        Duration::from_secs(30),
        sync.assign_role_on_chain(WALLET, role),
    )
    .await
    .expect("role sync did not finish")
}

// ============================================================
// Tests
// ============================================================

#[tokio::test]
async fn test_no_contract_code_stops_before_sending() {
    let node = MockNode::new(false, true);
    let url = spawn_node(node.clone()).await;

    let err = assign(&url, Role::Manufacturer).await.unwrap_err();

    assert!(matches!(err, SyncError::NoContractCode(ref addr) if addr == CONTRACT));
    assert_eq!(
        err.to_string(),
        format!("No contract code at PHARMA_NFT_ADDRESS: {}", CONTRACT)
    );
    assert!(node.called("eth_getCode"));
    assert!(!node.called("eth_sendRawTransaction"));
}

#[tokio::test]
async fn test_reverted_receipt_is_reported() {
    let node = MockNode::new(true, false);
    let url = spawn_node(node.clone()).await;

    let err = assign(&url, Role::Distributor).await.unwrap_err();

    assert!(matches!(err, SyncError::Reverted(ref hash) if hash == TX_HASH));
    assert_eq!(err.to_string(), format!("Transaction {} reverted", TX_HASH));
    assert!(node.called("eth_sendRawTransaction"));
}

#[tokio::test]
async fn test_successful_assignment_returns_tx_hash() {
    let node = MockNode::new(true, true);
    let url = spawn_node(node.clone()).await;

    let receipt = assign(&url, Role::Admin).await.unwrap();

    assert_eq!(receipt.tx_hash, TX_HASH);
    let calls = node.calls();
    let sent = calls
        .iter()
        .position(|m| m == "eth_sendRawTransaction")
        .expect("transaction was not sent");
    let code_check = calls.iter().position(|m| m == "eth_getCode").unwrap();
    assert!(code_check < sent);
    // Role read-back happens after the transaction is mined.
    assert!(calls[sent..].iter().any(|m| m == "eth_call"));
}
