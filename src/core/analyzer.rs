//! Poisoning Analyzer - orchestrates one address-pair analysis
//!
//! fetch (4 concurrent calls) → extract → index → match → score

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::core::extractor::extract_addresses;
use crate::core::provenance::build_provenance;
use crate::core::risk_score::RiskScorer;
use crate::core::similarity::find_similar;
use crate::models::config::AnalyzerConfig;
use crate::models::errors::AppResult;
use crate::models::types::{AddressDetail, AnalysisResult, TransactionRecord, TransferRecord};
use crate::providers::fetcher::HistoryFetcher;

/// Runs the risk engine against a history fetcher
#[derive(Clone)]
pub struct PoisoningAnalyzer {
    fetcher: Arc<dyn HistoryFetcher>,
    scorer: RiskScorer,
}

impl PoisoningAnalyzer {
    pub fn new(fetcher: Arc<dyn HistoryFetcher>, config: AnalyzerConfig) -> Self {
        Self {
            fetcher,
            scorer: RiskScorer::new(config),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.scorer.config()
    }

    /// Assess whether `to_address` impersonates an address `from_address` has dealt with.
    ///
    /// Any fetch failure aborts the whole analysis; no partial result is returned.
    pub async fn analyze(&self, from_address: &str, to_address: &str) -> AppResult<AnalysisResult> {
        let start = Instant::now();
        info!("🔍 Analyzing {} → {} via {}", from_address, to_address, self.fetcher.name());

        let ((from_transfers, from_txs), (to_transfers, to_txs)) = tokio::try_join!(
            self.fetch_history(from_address),
            self.fetch_history(to_address),
        )
        .map_err(|e| {
            warn!("❌ Fetch failed: {}", e);
            e
        })?;

        let provenance = build_provenance(&from_transfers);

        let from_addresses = extract_addresses(&from_transfers, &from_txs);
        let to_addresses = extract_addresses(&to_transfers, &to_txs);

        let similar = find_similar(to_address, &from_addresses, self.config().prefix_length());
        let assessment = self.scorer.score(to_address, &similar, &provenance);

        info!(
            "{} {} risk {}/100: {}",
            assessment.level().emoji(),
            to_address,
            assessment.risk_level,
            assessment.message
        );

        let mut result = AnalysisResult {
            from_address_data: AddressDetail {
                address: from_address.to_string(),
                transfers: from_transfers,
                transactions: from_txs,
                related_addresses: from_addresses.into_iter().collect(),
            },
            to_address_data: AddressDetail {
                address: to_address.to_string(),
                transfers: to_transfers,
                transactions: to_txs,
                related_addresses: to_addresses.into_iter().collect(),
            },
            similar_addresses: similar,
            risk_assessment: assessment,
            latency_ms: 0,
        };
        result.set_latency(start);

        Ok(result)
    }

    /// Transfers and transactions of one address, fetched concurrently
    async fn fetch_history(
        &self,
        address: &str,
    ) -> AppResult<(Vec<TransferRecord>, Vec<TransactionRecord>)> {
        let transfers = async {
            self.fetcher
                .fetch_transfers(address)
                .await
                .map_err(|e| e.context(format!("transfers for {}", address)))
        };
        let transactions = async {
            self.fetcher
                .fetch_transactions(address)
                .await
                .map_err(|e| e.context(format!("transactions for {}", address)))
        };

        tokio::try_join!(transfers, transactions)
    }
}
