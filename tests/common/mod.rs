//! In-memory history fetcher shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use poison_shield::utils::constants::NATIVE_SOL_TOKEN;
use poison_shield::{AppError, AppResult, BlockId, HistoryFetcher, TransactionRecord, TransferRecord};
use std::collections::{HashMap, HashSet};

pub const SOURCE: &str = "SRCwa11etSource1111111111111111111111111111";
pub const ORIGINAL: &str = "ABCDorigina1Counterparty11111111111111111111";
pub const IMPOSTOR: &str = "ABCDimpostorLookA1ike22222222222222222222222";
pub const OTHER: &str = "ABCDotherLookA1ike3333333333333333333333333";
pub const UNRELATED: &str = "ZZZZunre1atedAddress44444444444444444444444";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[derive(Default)]
pub struct MockFetcher {
    transfers: HashMap<String, Vec<TransferRecord>>,
    transactions: HashMap<String, Vec<TransactionRecord>>,
    failing_transactions: HashSet<String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transfers(mut self, address: &str, transfers: Vec<TransferRecord>) -> Self {
        self.transfers.insert(address.to_string(), transfers);
        self
    }

    pub fn with_transactions(mut self, address: &str, txs: Vec<TransactionRecord>) -> Self {
        self.transactions.insert(address.to_string(), txs);
        self
    }

    pub fn failing_transactions_for(mut self, address: &str) -> Self {
        self.failing_transactions.insert(address.to_string());
        self
    }
}

#[async_trait]
impl HistoryFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_transfers(&self, address: &str) -> AppResult<Vec<TransferRecord>> {
        Ok(self.transfers.get(address).cloned().unwrap_or_default())
    }

    async fn fetch_transactions(&self, address: &str) -> AppResult<Vec<TransactionRecord>> {
        if self.failing_transactions.contains(address) {
            return Err(AppError::fetch_failed("upstream returned 500"));
        }
        Ok(self.transactions.get(address).cloned().unwrap_or_default())
    }
}

pub fn transfer(
    from: &str,
    to: &str,
    block: Option<u64>,
    token: &str,
    value: Option<f64>,
) -> TransferRecord {
    TransferRecord {
        source: Some(from.to_string()),
        destination: Some(to.to_string()),
        block_id: BlockId::from_option(block),
        block_time: block.map(|b| 1_700_000_000 + b as i64),
        token_address: Some(token.to_string()),
        value,
        signature: Some(format!("sig-{}-{}", &to[..8], block.unwrap_or(0))),
        activity_type: Some("ACTIVITY_SPL_TRANSFER".to_string()),
    }
}

/// Source paid the real counterparty 5 USDC, then the impostor sent a native dust transfer
pub fn dusted_history() -> Vec<TransferRecord> {
    vec![
        transfer(SOURCE, ORIGINAL, Some(100), USDC, Some(5.0)),
        transfer(IMPOSTOR, SOURCE, Some(200), NATIVE_SOL_TOKEN, Some(0.0001)),
    ]
}
