//! Constants Module - Single Source of Truth
//!
//! Thresholds, provider endpoints and well-known token identifiers used
//! across the crate. Other modules read defaults from here.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("PoisonShield/", env!("CARGO_PKG_VERSION"));

// ============================================
// SOLSCAN CONSTANTS
// ============================================

/// Solscan Pro API v2 base URL
pub const SOLSCAN_BASE_URL: &str = "https://pro-api.solscan.io/v2.0";

/// Environment variable holding the Solscan API token
pub const SOLSCAN_TOKEN_ENV: &str = "SOLSCAN_API_TOKEN";

/// Transfers requested per page (`/account/transfer`)
pub const TRANSFER_PAGE_SIZE: u32 = 100;

/// Transactions requested per call (`/account/transactions`)
pub const TRANSACTION_LIMIT: u32 = 40;

/// Default timeout for provider requests (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Maximum attempts per provider request
pub const FETCH_MAX_RETRIES: u32 = 3;

/// Base retry delay in milliseconds, doubled per attempt
pub const FETCH_BASE_RETRY_MS: u64 = 500;

/// Retry delay cap in milliseconds
pub const FETCH_MAX_RETRY_MS: u64 = 8000;

/// Jitter percentage applied to every retry delay
pub const RETRY_JITTER_PERCENT: u64 = 20;

// ============================================
// TOKEN CONSTANTS
// ============================================

/// Solscan's identifier for native SOL in transfer records
pub const NATIVE_SOL_TOKEN: &str = "So11111111111111111111111111111111111111111";

/// Wrapped SOL mint (an SPL token, not native)
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Decimals of native SOL (lamports)
pub const SOL_DECIMALS: u8 = 9;

// ============================================
// SCORING CONSTANTS
// ============================================

/// Leading characters compared by the similarity matcher
pub const DEFAULT_PREFIX_LENGTH: usize = 4;

/// Native transfers below this amount are treated as dust probes
pub const DUST_THRESHOLD: f64 = 0.001;

/// Destination value below original / ratio counts as a disparity
pub const VALUE_DISPARITY_RATIO: f64 = 5.0;

/// Risk added per similar address
pub const RISK_PER_MATCH: u8 = 20;

/// Risk level after a value-based escalation
pub const ESCALATED_RISK: u8 = 90;

/// Upper bound of any risk level
pub const MAX_RISK: u8 = 100;

// ============================================
// SERVER CONSTANTS
// ============================================

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Time budget for one analysis at the API boundary (seconds)
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 30;

/// Check whether a token identifier denotes native SOL
pub fn is_native_sol(token: &str) -> bool {
    token == NATIVE_SOL_TOKEN
}
