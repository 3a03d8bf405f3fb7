use blockchain::{to_checksum, ChainClient, TokenQuery};
use futures::stream::{self, StreamExt};
use shared::{AddressResult, Error, FailureReason, Result, RunSummary};
use std::borrow::Cow;
use std::path::Path;
use tracing::{error, info, warn};

use crate::report::ReportWriter;

/// Runs a token query over every line of an address file and streams the
/// per-address report in input order.
pub struct BatchProcessor<C: ChainClient> {
    query: TokenQuery<C>,
    concurrency: usize,
}

impl<C: ChainClient> BatchProcessor<C> {
    pub fn new(query: TokenQuery<C>) -> Self {
        Self {
            query,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` balance lookups in flight. Rows are still
    /// written in input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn query(&self) -> &TokenQuery<C> {
        &self.query
    }

    /// Process `input_path` and write the report to `output_path`.
    ///
    /// Aborts before writing anything when the input file is missing or the
    /// token decimals cannot be read. Per-address failures never abort the
    /// run; they become report rows.
    pub async fn run(&self, input_path: &Path, output_path: &Path) -> Result<RunSummary> {
        if !input_path.exists() {
            error!("File not found: {}", input_path.display());
            return Err(Error::MissingInputFile(input_path.to_path_buf()));
        }

        let decimals = match self.query.fetch_decimals().await {
            Ok(decimals) => decimals,
            Err(e) => {
                error!("Failed to retrieve token decimals after retries. Exiting...");
                return Err(e);
            }
        };

        let contents = tokio::fs::read(input_path).await?;
        let lines = split_lines(&contents);
        let total = lines.len();
        info!(
            "Checking {} addresses against token {} ({} decimals)",
            total,
            self.query.contract(),
            decimals
        );

        let mut report = ReportWriter::create(output_path)?;
        let mut summary = RunSummary::new(decimals);

        let mut results = std::pin::pin!(stream::iter(&lines)
            .map(|line| self.process_line(line, decimals))
            .buffered(self.concurrency));

        let mut processed = 0;
        while let Some(result) = results.next().await {
            processed += 1;
            report.write_result(&result)?;
            info!("{}", result.report_row());
            summary.record(&result);
            info!("Progress {} of {}", processed, total);
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Resolve one input line to exactly one result
    pub async fn process_line(&self, line: &str, decimals: u8) -> AddressResult {
        let input = line.trim();

        let address = match self.query.client().normalize_address(input) {
            Ok(address) => address,
            Err(e) => {
                warn!(
                    reason = FailureReason::InvalidAddress.tag(),
                    "Error processing address {}: {}",
                    input,
                    e
                );
                return AddressResult::Failure {
                    address: input.to_string(),
                    reason: FailureReason::InvalidAddress,
                };
            }
        };
        let checksum = to_checksum(&address);

        match self.query.fetch_balance(input, decimals).await {
            Ok(amount) => AddressResult::Success {
                address: checksum,
                amount,
            },
            Err(e) => {
                warn!(reason = FailureReason::BalanceRetrievalFailed.tag(), "{}", e);
                AddressResult::Failure {
                    address: checksum,
                    reason: FailureReason::BalanceRetrievalFailed,
                }
            }
        }
    }
}

/// Split raw file contents into lines the way `str::lines` does, decoding
/// each line on its own. Bytes that are not UTF-8 become U+FFFD, so such a
/// line is reported as an invalid address instead of failing the read.
fn split_lines(contents: &[u8]) -> Vec<Cow<'_, str>> {
    if contents.is_empty() {
        return Vec::new();
    }

    let body = contents.strip_suffix(b"\n").unwrap_or(contents);
    body.split(|byte| *byte == b'\n')
        .map(|line| String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line)))
        .collect()
}

fn log_summary(summary: &RunSummary) {
    info!("Summary:");
    info!("Total addresses processed: {}", summary.total_addresses);
    info!("Addresses with tokens: {}", summary.addresses_with_tokens);
    info!("Total tokens found: {}", summary.total_tokens);
}
