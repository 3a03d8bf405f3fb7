// Shared fixtures for batch tests: a scripted in-memory chain and temp files

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use blockchain::erc20::{balanceOfCall, decimalsCall};
use blockchain::{ChainClient, RetryConfig, TokenQuery};
use shared::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// EIP-55 reference vectors
pub const ADDR_A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const ADDR_B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const ADDR_C: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
pub const ADDR_D: &str = "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb";

pub const TOKEN: &str = "0x937a1cFAF0A3d9f5Dc4D0927F72ee5e3e5F82a00";

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

/// Answers `decimals()` and `balanceOf()` from fixed tables and counts calls
pub struct MockChainClient {
    decimals: Option<u8>,
    balances: HashMap<Address, U256>,
    failing: HashSet<Address>,
    latency: HashMap<Address, Duration>,
    pub decimals_calls: AtomicU32,
    pub balance_calls: AtomicU32,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockChainClient {
    /// `None` makes every `decimals()` call fail
    pub fn new(decimals: Option<u8>) -> Self {
        Self {
            decimals,
            balances: HashMap::new(),
            failing: HashSet::new(),
            latency: HashMap::new(),
            decimals_calls: AtomicU32::new(0),
            balance_calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, address: &str, raw: u128) -> Self {
        self.balances.insert(addr(address), U256::from(raw));
        self
    }

    pub fn with_failing(mut self, address: &str) -> Self {
        self.failing.insert(addr(address));
        self
    }

    pub fn with_latency(mut self, address: &str, latency: Duration) -> Self {
        self.latency.insert(addr(address), latency);
        self
    }

    async fn balance_of(&self, owner: Address) -> Result<Bytes> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency.get(&owner) {
            tokio::time::sleep(*latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&owner) {
            return Err(Error::EvmRpc("execution timeout".to_string()));
        }
        Ok(word(self.balances.get(&owner).copied().unwrap_or(U256::ZERO)))
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn is_connected(&self) -> bool {
        true
    }

    async fn call_contract(&self, _contract: Address, calldata: Bytes) -> Result<Bytes> {
        if calldata.len() < 4 {
            return Err(Error::EvmRpc("calldata too short".to_string()));
        }

        let selector = &calldata[..4];
        if selector == decimalsCall::SELECTOR {
            self.decimals_calls.fetch_add(1, Ordering::SeqCst);
            return self
                .decimals
                .map(|d| word(U256::from(d)))
                .ok_or_else(|| Error::EvmRpc("header not found".to_string()));
        }
        if selector == balanceOfCall::SELECTOR && calldata.len() == 36 {
            return self.balance_of(Address::from_slice(&calldata[16..36])).await;
        }

        Err(Error::EvmRpc("execution reverted".to_string()))
    }
}

pub fn token_query(client: MockChainClient) -> TokenQuery<MockChainClient> {
    TokenQuery::with_retry(
        Arc::new(client),
        addr(TOKEN),
        RetryConfig::fixed(3, Duration::from_millis(1)),
    )
}

/// Unique, removed-on-drop paths under the system temp dir
pub struct TempFiles {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TempFiles {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let dir = std::env::temp_dir();
        Self {
            input: dir.join(format!("balance-checker-{}-address.txt", id)),
            output: dir.join(format!("balance-checker-{}-result.txt", id)),
        }
    }

    pub fn with_input(lines: &[&str]) -> Self {
        let files = Self::new();
        let mut contents = lines.join("\n");
        contents.push('\n');
        std::fs::write(&files.input, contents).unwrap();
        files
    }

    pub fn output_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.input);
        let _ = std::fs::remove_file(&self.output);
    }
}
