//! History Fetcher boundary
//!
//! The analyzer only talks to this trait; Solscan is one implementation,
//! tests plug in in-memory ones.

use async_trait::async_trait;

use crate::models::errors::AppResult;
use crate::models::types::{TransactionRecord, TransferRecord};

/// Source of per-address ledger history
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Transfer records in which `address` took part
    async fn fetch_transfers(&self, address: &str) -> AppResult<Vec<TransferRecord>>;

    /// Transaction records signed by or involving `address`
    async fn fetch_transactions(&self, address: &str) -> AppResult<Vec<TransactionRecord>>;
}
