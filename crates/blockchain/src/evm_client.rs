use alloy::primitives::{hex, Address, Bytes};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Error, Result, RpcConfig};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::chain::ChainClient;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client for an EVM node, with an optional fallback endpoint
pub struct EvmClient {
    primary_rpc_url: String,
    fallback_rpc_url: Option<String>,
    http: reqwest::Client,
}

impl EvmClient {
    /// Create a new EVM client with primary and optional fallback RPC endpoints
    pub fn new(
        rpc_url: String,
        fallback_url: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        info!("Initializing EVM client with primary RPC: {}", rpc_url);
        if let Some(url) = &fallback_url {
            info!("Configuring fallback RPC: {}", url);
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Connectivity(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            primary_rpc_url: rpc_url,
            fallback_rpc_url: fallback_url,
            http,
        })
    }

    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        Self::new(
            config.url.clone(),
            config.fallback_url.clone(),
            config.request_timeout,
        )
    }

    pub fn primary_rpc_url(&self) -> &str {
        &self.primary_rpc_url
    }

    /// Startup check: fail with `Error::Connectivity` unless the primary or
    /// the fallback endpoint answers
    pub async fn ensure_connected(&self) -> Result<()> {
        if self.is_connected().await {
            info!("Connected to {}", self.primary_rpc_url);
            return Ok(());
        }

        error!("Failed to connect to {}", self.primary_rpc_url);
        Err(Error::Connectivity(format!(
            "no RPC endpoint reachable (primary: {})",
            self.primary_rpc_url
        )))
    }

    /// Send a request to the primary endpoint, then to the fallback if the
    /// primary fails
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match self.send(&self.primary_rpc_url, method, &params).await {
            Ok(value) => Ok(value),
            Err(e) => {
                let Some(fallback_url) = &self.fallback_rpc_url else {
                    return Err(e);
                };
                warn!(
                    "Primary RPC failed for {}: {}. Trying fallback RPC",
                    method, e
                );
                self.send(fallback_url, method, &params).await
            }
        }
    }

    async fn send(&self, rpc_url: &str, method: &str, params: &Value) -> Result<Value> {
        debug!("RPC {} -> {}", method, rpc_url);

        let request_body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let response = self
            .http
            .post(rpc_url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::EvmRpc(format!("Failed to send RPC request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::EvmRpc(format!(
                "RPC request failed with status: {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::EvmRpc(format!("Failed to parse RPC response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(Error::EvmRpc(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        body.result
            .ok_or_else(|| Error::EvmRpc(format!("Missing result in {} response", method)))
    }
}

/// Decode a `0x`-prefixed hex string returned by `eth_call`
fn decode_hex_result(value: &Value) -> Result<Bytes> {
    let encoded = value
        .as_str()
        .ok_or_else(|| Error::EvmRpc("eth_call result is not a string".to_string()))?;

    hex::decode(encoded)
        .map(Bytes::from)
        .map_err(|e| Error::EvmRpc(format!("Invalid hex in eth_call result: {}", e)))
}

#[async_trait]
impl ChainClient for EvmClient {
    /// Health check via `eth_blockNumber`
    async fn is_connected(&self) -> bool {
        match self.request("eth_blockNumber", json!([])).await {
            Ok(block) => {
                debug!("Connected, latest block {}", block);
                true
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }

    async fn call_contract(&self, contract: Address, calldata: Bytes) -> Result<Bytes> {
        let params = json!([
            {
                "to": contract.to_string(),
                "data": hex::encode_prefixed(&calldata),
            },
            "latest"
        ]);

        let result = self.request("eth_call", params).await?;
        decode_hex_result(&result)
    }
}
