use alloy::primitives::Address;
use shared::{Error, Result, TokenAmount};
use std::sync::Arc;
use tracing::debug;

use crate::chain::ChainClient;
use crate::erc20;
use crate::retry::{retry, RetryConfig};

/// ERC-20 reads against a single token contract, each wrapped in the retry policy
pub struct TokenQuery<C: ChainClient> {
    client: Arc<C>,
    contract: Address,
    retry_config: RetryConfig,
}

impl<C: ChainClient> TokenQuery<C> {
    /// Uses the default policy of 3 attempts, 5 seconds apart
    pub fn new(client: Arc<C>, contract: Address) -> Self {
        Self::with_retry(client, contract, RetryConfig::default())
    }

    pub fn with_retry(client: Arc<C>, contract: Address, retry_config: RetryConfig) -> Self {
        Self {
            client,
            contract,
            retry_config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Read `decimals()` from the token contract
    pub async fn fetch_decimals(&self) -> Result<u8> {
        let decimals = retry("decimals", &self.retry_config, || async move {
            let data = self
                .client
                .call_contract(self.contract, erc20::encode_decimals())
                .await?;
            erc20::decode_decimals(&data)
        })
        .await
        .map_err(|exhausted| Error::DecimalsUnavailable {
            attempts: exhausted.attempts,
        })?;

        debug!("Token {} uses {} decimals", self.contract, decimals);
        Ok(decimals)
    }

    /// Read `balanceOf(address)` and scale it by `decimals`
    pub async fn fetch_balance(&self, address: &str, decimals: u8) -> Result<TokenAmount> {
        let owner = self.client.normalize_address(address)?;
        let operation_name = format!("balanceOf({})", owner);

        let raw = retry(&operation_name, &self.retry_config, || async move {
            let data = self
                .client
                .call_contract(self.contract, erc20::encode_balance_of(owner))
                .await?;
            erc20::decode_balance(&data)
        })
        .await
        .map_err(|exhausted| Error::BalanceUnavailable {
            address: owner.to_string(),
            attempts: exhausted.attempts,
        })?;

        Ok(TokenAmount::new(raw, decimals))
    }
}
