pub mod models;
pub mod error;
pub mod config;

pub use config::{BatchConfig, Config, LogFormat, RetrySettings, RpcConfig};
pub use error::{Error, Result};
pub use models::{AddressResult, FailureReason, RunSummary, TokenAmount, DISPLAY_DECIMALS};
