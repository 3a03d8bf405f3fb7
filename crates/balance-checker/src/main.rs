use anyhow::Result;
use balance_checker::{logging::init_logging, BatchProcessor};
use blockchain::{ChainClient, EvmClient, RetryConfig, TokenQuery};
use shared::{Config, Error, LogFormat};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::from_env() {
        Ok(config) => {
            init_logging(config.log_format);
            config
        }
        Err(e) => {
            init_logging(LogFormat::default());
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting token balance checker");

    let client = EvmClient::from_config(&config.rpc)?;
    client.ensure_connected().await?;

    let contract = client.normalize_address(&config.contract_address)?;
    let query = TokenQuery::with_retry(
        Arc::new(client),
        contract,
        RetryConfig::from(config.retry),
    );
    let processor = BatchProcessor::new(query).with_concurrency(config.batch.concurrency);

    match processor.run(&config.input_path, &config.output_path).await {
        Ok(summary) => {
            tracing::info!(
                "Results written to {} ({} addresses)",
                config.output_path.display(),
                summary.total_addresses
            );
            Ok(())
        }
        // Reported by the processor; the run ends without a report
        Err(Error::MissingInputFile(_)) | Err(Error::DecimalsUnavailable { .. }) => Ok(()),
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
