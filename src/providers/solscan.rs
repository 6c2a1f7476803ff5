//! Solscan Provider Module
//!
//! History fetcher backed by the Solscan Pro API v2:
//! - GET /account/transfer      - SOL and SPL transfers of an account
//! - GET /account/transactions  - recent transactions (signers, slot, status)
//!
//! Requests carry the API token in the `token` header, use gzip, and retry
//! rate-limit/timeout/connect failures with jittered exponential backoff.
//! Missing fields in responses are kept as `None` and resolved by the engine.

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::fetcher::HistoryFetcher;
use crate::models::config::SolscanConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{BlockId, TransactionRecord, TransferRecord};
use crate::utils::constants::{
    is_native_sol, FETCH_BASE_RETRY_MS, FETCH_MAX_RETRY_MS, RETRY_JITTER_PERCENT, SOL_DECIMALS,
    USER_AGENT as USER_AGENT_CONST,
};
use crate::utils::decoder::decode_amount;

// ============================================
// SOLSCAN RESPONSE TYPES
// ============================================

/// Envelope of every Solscan v2 response
#[derive(Debug, Deserialize)]
pub struct SolscanResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub errors: Option<SolscanErrorBody>,
}

/// Error body returned with `success: false`
#[derive(Debug, Clone, Deserialize)]
pub struct SolscanErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of `/account/transfer`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolscanTransfer {
    pub block_id: Option<u64>,
    pub trans_id: Option<String>,
    pub block_time: Option<i64>,
    pub activity_type: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub token_address: Option<String>,
    pub token_decimals: Option<u8>,
    pub amount: Option<serde_json::Value>,
}

impl From<SolscanTransfer> for TransferRecord {
    fn from(raw: SolscanTransfer) -> Self {
        let decimals = raw.token_decimals.or_else(|| {
            raw.token_address
                .as_deref()
                .filter(|t| is_native_sol(t))
                .map(|_| SOL_DECIMALS)
        });

        TransferRecord {
            source: raw.from_address.filter(|a| !a.is_empty()),
            destination: raw.to_address.filter(|a| !a.is_empty()),
            block_id: BlockId::from_option(raw.block_id),
            block_time: raw.block_time,
            token_address: raw.token_address.filter(|a| !a.is_empty()),
            value: decode_amount(raw.amount.as_ref(), decimals),
            signature: raw.trans_id,
            activity_type: raw.activity_type,
        }
    }
}

/// One entry of `/account/transactions`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolscanTransaction {
    pub slot: Option<u64>,
    pub status: Option<String>,
    pub signer: Option<Vec<String>>,
    pub block_time: Option<i64>,
    pub tx_hash: Option<String>,
}

impl From<SolscanTransaction> for TransactionRecord {
    fn from(raw: SolscanTransaction) -> Self {
        TransactionRecord {
            signers: raw
                .signer
                .unwrap_or_default()
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
            signature: raw.tx_hash,
            slot: BlockId::from_option(raw.slot),
            block_time: raw.block_time,
            status: raw.status,
        }
    }
}

// ============================================
// SOLSCAN CLIENT
// ============================================

/// Solscan Pro API client
pub struct SolscanClient {
    client: reqwest::Client,
    config: SolscanConfig,
}

impl SolscanClient {
    /// Create a client from explicit configuration
    pub fn new(config: SolscanConfig) -> AppResult<Self> {
        let client = Self::build_client(&config)?;
        info!("✅ Solscan client ready ({})", config.base_url);
        Ok(Self { client, config })
    }

    /// Convenience constructor reading `SolscanConfig::from_env`
    pub fn from_env() -> AppResult<Self> {
        Self::new(SolscanConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build HTTP client with auth header and gzip
    fn build_client(config: &SolscanConfig) -> AppResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let mut token = HeaderValue::from_str(&config.api_token)
            .map_err(|_| AppError::invalid_config("Solscan API token contains invalid characters"))?;
        token.set_sensitive(true);
        headers.insert("token", token);

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
    }

    /// GET with exponential backoff (base → 2x per attempt, capped, ±jitter)
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = retry_delay_ms(attempt);
                debug!("⏳ Retry {}/{} for {} after {}ms", attempt + 1, attempts, path, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.execute_get::<T>(path, query).await {
                Ok(items) => return Ok(items),
                Err(e) if e.code.is_retryable() => {
                    warn!("⚠️ Solscan {} failed (attempt {}/{}): {}", path, attempt + 1, attempts, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::fetch_failed(format!("{} failed after {} attempts", path, attempts))
        }))
    }

    /// Execute single GET request
    async fn execute_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::fetch_rate_limited());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::fetch_unauthorized(format!(
                "Solscan rejected the API token (HTTP {})",
                status.as_u16()
            )));
        }
        if status == StatusCode::GATEWAY_TIMEOUT {
            return Err(AppError::fetch_timeout("Solscan gateway timeout (HTTP 504)"));
        }
        if !status.is_success() {
            return Err(AppError::fetch_failed(format!("HTTP error: {}", status)));
        }

        let body = response.bytes().await?;
        parse_response(&body)
    }
}

/// Decode a Solscan envelope, turning `success: false` into a fetch error
pub fn parse_response<T: DeserializeOwned>(body: &[u8]) -> AppResult<Vec<T>> {
    let envelope: SolscanResponse<T> = serde_json::from_slice(body)?;

    if !envelope.success {
        let detail = envelope
            .errors
            .and_then(|e| e.message.map(|m| format!("{} (code: {})", m, e.code.unwrap_or_default())))
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(AppError::fetch_failed(format!("Solscan error: {}", detail)));
    }

    Ok(envelope.data.unwrap_or_default())
}

/// Backoff for the given attempt (1-based retry count), with ±jitter
fn retry_delay_ms(attempt: u32) -> u64 {
    let base_delay = FETCH_BASE_RETRY_MS.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)));
    let capped_delay = base_delay.min(FETCH_MAX_RETRY_MS);

    let jitter_range = (capped_delay * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 = rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    (capped_delay as i64 + jitter).max(100) as u64
}

#[async_trait]
impl HistoryFetcher for SolscanClient {
    fn name(&self) -> &'static str {
        "solscan"
    }

    async fn fetch_transfers(&self, address: &str) -> AppResult<Vec<TransferRecord>> {
        let query = [
            ("address", address.to_string()),
            ("page", "1".to_string()),
            ("page_size", self.config.transfer_page_size.to_string()),
            ("sort_by", "block_time".to_string()),
            ("sort_order", "desc".to_string()),
        ];

        let raw: Vec<SolscanTransfer> = self.get_with_retry("/account/transfer", &query).await?;
        debug!("📥 {} transfers for {}", raw.len(), address);

        Ok(raw.into_iter().map(TransferRecord::from).collect())
    }

    async fn fetch_transactions(&self, address: &str) -> AppResult<Vec<TransactionRecord>> {
        let query = [
            ("address", address.to_string()),
            ("limit", self.config.transaction_limit.to_string()),
        ];

        let raw: Vec<SolscanTransaction> =
            self.get_with_retry("/account/transactions", &query).await?;
        debug!("📥 {} transactions for {}", raw.len(), address);

        Ok(raw.into_iter().map(TransactionRecord::from).collect())
    }
}
