use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to RPC endpoint: {0}")]
    Connectivity(String),

    #[error("Failed to retrieve token decimals after {attempts} attempts")]
    DecimalsUnavailable { attempts: u32 },

    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    #[error("Failed to retrieve balance for {address} after {attempts} attempts")]
    BalanceUnavailable { address: String, attempts: u32 },

    #[error("File not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("EVM RPC error: {0}")]
    EvmRpc(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
