pub mod chain;
pub mod erc20;
pub mod evm_client;
pub mod retry;
pub mod token_query;

pub use chain::{parse_address, to_checksum, ChainClient};
pub use evm_client::EvmClient;
pub use retry::{retry, RetryConfig, RetryExhausted};
pub use token_query::TokenQuery;
