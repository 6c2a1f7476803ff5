//! API Request/Response Types

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::models::errors::AppError;
use crate::models::types::{AnalysisResult, RiskAssessment};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: std::error::Error::source(err).map(|s| s.to_string()),
        }
    }
}

/// Error response as returned by handlers and middleware
pub type ErrorReply = (StatusCode, Json<ApiResponse<()>>);

/// Map an `AppError` to its HTTP status and error envelope
pub fn error_reply(err: &AppError, start: Instant) -> ErrorReply {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(
            ApiError::from(err),
            start.elapsed().as_secs_f64() * 1000.0,
        )),
    )
}

// ============================================
// Address Check
// ============================================

/// Body of `POST /check-addresses`
#[derive(Debug, Deserialize)]
pub struct AddressCheckRequest {
    #[serde(alias = "from_address")]
    pub from_address_check: String,
    #[serde(alias = "to_address")]
    pub to_address_check: String,
    /// Attach raw transfers/transactions of both addresses
    #[serde(default = "default_include_raw")]
    pub include_raw: bool,
}

fn default_include_raw() -> bool {
    true
}

impl AddressCheckRequest {
    /// Trimmed (from, to), or a message describing what is wrong
    pub fn validated(&self) -> Result<(&str, &str), String> {
        let from = self.from_address_check.trim();
        let to = self.to_address_check.trim();

        for (field, value) in [("from_address_check", from), ("to_address_check", to)] {
            if value.is_empty() {
                return Err(format!("{} must not be empty", field));
            }
            if value.len() > MAX_ADDRESS_LEN || value.chars().any(|c| !c.is_ascii_alphanumeric()) {
                return Err(format!("{} is not a valid address string", field));
            }
        }

        Ok((from, to))
    }
}

/// Longest accepted address string (base58 Solana keys are 32-44 chars)
const MAX_ADDRESS_LEN: usize = 64;

#[derive(Debug, Serialize)]
pub struct AddressCheckData {
    pub is_risky: bool,
    pub risk_level: u8,
    pub message: String,
    pub similar_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_address: Option<String>,
    pub confidence: String,
    pub level: String,
    pub color: String,
    pub factors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_data: Option<AnalysisResult>,
}

impl From<RiskAssessment> for AddressCheckData {
    fn from(assessment: RiskAssessment) -> Self {
        let level = assessment.level();
        Self {
            is_risky: assessment.is_risky,
            risk_level: assessment.risk_level,
            factors: assessment.factors.iter().map(|f| f.description()).collect(),
            message: assessment.message,
            similar_addresses: assessment.similar_addresses,
            original_address: assessment.original_address,
            confidence: assessment.confidence.as_str().to_string(),
            level: level.as_str().to_string(),
            color: level.color_code().to_string(),
            analysis_data: None,
        }
    }
}

impl AddressCheckData {
    /// Build from a full analysis, keeping raw data when asked
    pub fn from_analysis(result: AnalysisResult, include_raw: bool) -> Self {
        let mut data = Self::from(result.risk_assessment.clone());
        if include_raw {
            data.analysis_data = Some(result);
        }
        data
    }
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
