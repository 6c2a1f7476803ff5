//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so it can be traced in logs
//! and mapped to an HTTP status by the API layer.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - FETCH_xxx: History fetcher (Solscan) errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Prefix the message with context, keeping code and source
    pub fn context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    /// True for any failure of the history fetcher
    pub fn is_fetch_failure(&self) -> bool {
        self.code.is_fetch()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Fetch Errors (1xx)
    // ============================================
    /// Data provider request failed (network, HTTP status, provider error)
    FetchFailed,
    /// Data provider request timed out
    FetchTimeout,
    /// Data provider rate limited us (HTTP 429)
    FetchRateLimited,
    /// Data provider rejected the API token (HTTP 401/403)
    FetchUnauthorized,
    /// Response body could not be decoded
    FetchInvalidResponse,
    /// Could not open a connection to the provider
    FetchConnectionFailed,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Unauthorized (invalid API key)
    ApiUnauthorized,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Analysis exceeded the server's time budget
    ApiTimeout,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Missing API key
    ConfigMissingApiKey,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchFailed => "FETCH_FAILED",
            Self::FetchTimeout => "FETCH_TIMEOUT",
            Self::FetchRateLimited => "FETCH_RATE_LIMITED",
            Self::FetchUnauthorized => "FETCH_UNAUTHORIZED",
            Self::FetchInvalidResponse => "FETCH_INVALID_RESPONSE",
            Self::FetchConnectionFailed => "FETCH_CONNECTION_FAILED",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiTimeout => "API_TIMEOUT",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigMissingApiKey => "CFG_MISSING_API_KEY",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::ApiRateLimited => 429,
            Self::FetchFailed
            | Self::FetchRateLimited
            | Self::FetchUnauthorized
            | Self::FetchInvalidResponse
            | Self::FetchConnectionFailed => 502,
            Self::FetchTimeout | Self::ApiTimeout => 504,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FetchTimeout | Self::FetchRateLimited | Self::FetchConnectionFailed
        )
    }

    /// Check if the code belongs to the history fetcher
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed
                | Self::FetchTimeout
                | Self::FetchRateLimited
                | Self::FetchUnauthorized
                | Self::FetchInvalidResponse
                | Self::FetchConnectionFailed
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Generic fetch failure
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchFailed, msg)
    }

    /// Fetch timeout
    pub fn fetch_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchTimeout, msg)
    }

    /// Provider rate limited
    pub fn fetch_rate_limited() -> Self {
        Self::new(ErrorCode::FetchRateLimited, "Rate limited (HTTP 429)")
    }

    /// Provider rejected credentials
    pub fn fetch_unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchUnauthorized, msg)
    }

    /// Request without a valid API key
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::ApiUnauthorized, "Invalid or missing API key")
    }

    /// Caller exhausted its rate-limit window
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::new(
            ErrorCode::ApiRateLimited,
            format!("Rate limit exceeded. Retry after {} seconds", retry_after_secs),
        )
    }

    /// Missing API key
    pub fn missing_api_key(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingApiKey,
            format!("Missing API key: {}", key_name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Analysis timed out at the API boundary
    pub fn analysis_timeout(secs: u64) -> Self {
        Self::new(
            ErrorCode::ApiTimeout,
            format!("Analysis did not complete within {}s", secs),
        )
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::FetchTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::FetchConnectionFailed, "Connection failed")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::FetchInvalidResponse, "Response decode failed", err)
        } else {
            Self::new(ErrorCode::FetchFailed, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::FetchInvalidResponse, "JSON parse error", err)
    }
}
