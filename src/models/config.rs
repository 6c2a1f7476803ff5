//! Configuration module for Poison Shield
//!
//! Defaults come from utils/constants.rs. Credentials are read once into
//! an explicit config value and handed to the client that needs them.

use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_PREFIX_LENGTH, DUST_THRESHOLD, ESCALATED_RISK, FETCH_MAX_RETRIES, NATIVE_SOL_TOKEN,
    RISK_PER_MATCH, SOLSCAN_BASE_URL, SOLSCAN_TOKEN_ENV, TRANSACTION_LIMIT, TRANSFER_PAGE_SIZE,
    VALUE_DISPARITY_RATIO,
};

/// Tunables of the similarity matcher and risk scorer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Leading characters compared by the matcher, at least 1
    prefix_length: usize,
    /// Token identifier treated as the native token
    pub native_token: String,
    /// Native value below which a transfer counts as dust
    pub dust_threshold: f64,
    /// Destination value must be below original / ratio to flag disparity
    pub disparity_ratio: f64,
    /// Risk added per similar address
    pub risk_per_match: u8,
    /// Risk floor after escalation
    pub escalated_risk: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            prefix_length: DEFAULT_PREFIX_LENGTH,
            native_token: NATIVE_SOL_TOKEN.to_string(),
            dust_threshold: DUST_THRESHOLD,
            disparity_ratio: VALUE_DISPARITY_RATIO,
            risk_per_match: RISK_PER_MATCH,
            escalated_risk: ESCALATED_RISK,
        }
    }
}

impl AnalyzerConfig {
    /// Override the prefix length (0 is rejected)
    pub fn with_prefix_length(mut self, prefix_length: usize) -> AppResult<Self> {
        if prefix_length == 0 {
            return Err(AppError::invalid_config("prefix_length must be at least 1"));
        }
        self.prefix_length = prefix_length;
        Ok(self)
    }

    pub fn prefix_length(&self) -> usize {
        self.prefix_length
    }
}

/// Connection settings for the Solscan Pro API
#[derive(Clone)]
pub struct SolscanConfig {
    /// API token sent in the `token` header. Never logged.
    pub api_token: String,
    pub base_url: String,
    pub transfer_page_size: u32,
    pub transaction_limit: u32,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl SolscanConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: SOLSCAN_BASE_URL.to_string(),
            transfer_page_size: TRANSFER_PAGE_SIZE,
            transaction_limit: TRANSACTION_LIMIT,
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_retries: FETCH_MAX_RETRIES,
        }
    }

    /// Read settings from the environment
    ///
    /// `SOLSCAN_API_TOKEN` is required; `SOLSCAN_BASE_URL` and
    /// `SOLSCAN_TIMEOUT_SECS` are optional.
    pub fn from_env() -> AppResult<Self> {
        let api_token = std::env::var(SOLSCAN_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty() && t != "YOUR_API_TOKEN")
            .ok_or_else(|| AppError::missing_api_key(SOLSCAN_TOKEN_ENV))?;
        info!("🔑 {} configured (token hidden)", SOLSCAN_TOKEN_ENV);

        let mut config = Self::new(api_token);

        if let Ok(url) = std::env::var("SOLSCAN_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(raw) = std::env::var("SOLSCAN_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                AppError::invalid_config(format!("SOLSCAN_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl std::fmt::Debug for SolscanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolscanConfig")
            .field("api_token", &"***")
            .field("base_url", &self.base_url)
            .field("transfer_page_size", &self.transfer_page_size)
            .field("transaction_limit", &self.transaction_limit)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single `analyze` call
    pub analysis_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            analysis_timeout: Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Railway-style `PORT` wins over `POISON_SHIELD_PORT`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("POISON_SHIELD_HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("POISON_SHIELD_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let analysis_timeout = std::env::var("POISON_SHIELD_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.analysis_timeout);

        Self {
            host,
            port,
            analysis_timeout,
        }
    }
}
