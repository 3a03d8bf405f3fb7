use crate::error::{Error, Result};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://base.llamarpc.com";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x937a1cFAF0A3d9f5Dc4D0927F72ee5e3e5F82a00";

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc: RpcConfig,
    pub contract_address: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub retry: RetrySettings,
    pub batch: BatchConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub fallback_url: Option<String>,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total invocations per call, including the first one
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of balance lookups allowed in flight at once (1 = sequential)
    pub concurrency: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                url: DEFAULT_RPC_URL.to_string(),
                fallback_url: None,
                request_timeout: Duration::from_secs(30),
            },
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            input_path: PathBuf::from("address.txt"),
            output_path: PathBuf::from("result.txt"),
            retry: RetrySettings::default(),
            batch: BatchConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Build the run configuration from the environment (and `.env`, if present).
    /// Unset variables fall back to the defaults in [`Config::default`].
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            rpc: RpcConfig {
                url: env::var("RPC_URL").unwrap_or(defaults.rpc.url),
                fallback_url: env::var("RPC_FALLBACK_URL").ok().filter(|u| !u.trim().is_empty()),
                request_timeout: Duration::from_secs(var_or(
                    "RPC_TIMEOUT_SECS",
                    defaults.rpc.request_timeout.as_secs(),
                )?),
            },
            contract_address: env::var("CONTRACT_ADDRESS").unwrap_or(defaults.contract_address),
            input_path: env::var("ADDRESS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            output_path: env::var("RESULT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            retry: RetrySettings {
                max_attempts: var_or("MAX_RETRIES", defaults.retry.max_attempts)?,
                delay: Duration::from_secs(var_or(
                    "RETRY_DELAY_SECS",
                    defaults.retry.delay.as_secs(),
                )?),
            },
            batch: BatchConfig {
                concurrency: var_or("BATCH_CONCURRENCY", defaults.batch.concurrency)?,
            },
            log_format: var_or("LOG_FORMAT", defaults.log_format)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("MAX_RETRIES must be at least 1".to_string()));
        }
        if self.batch.concurrency == 0 {
            return Err(Error::Config(
                "BATCH_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.rpc.url.trim().is_empty() {
            return Err(Error::Config("RPC_URL must not be empty".to_string()));
        }
        Ok(())
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| Error::Config(format!("{}='{}': {}", key, raw, e)))
}
