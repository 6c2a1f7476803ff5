//! API Request Handlers

use axum::extract::{Json, State};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::types::*;
use crate::core::analyzer::PoisoningAnalyzer;
use crate::models::errors::AppError;

/// Shared application state
pub struct AppState {
    pub analyzer: PoisoningAnalyzer,
    pub analysis_timeout: Duration,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analyzer: PoisoningAnalyzer, analysis_timeout: Duration) -> Self {
        Self {
            analyzer,
            analysis_timeout,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Address Check
// ============================================

pub async fn check_addresses(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddressCheckRequest>,
) -> Result<Json<ApiResponse<AddressCheckData>>, ErrorReply> {
    let start = Instant::now();

    let (from, to) = req
        .validated()
        .map_err(|msg| error_reply(&AppError::bad_request(msg), start))?;

    info!("📨 Address check: {} → {}", from, to);

    let outcome = tokio::time::timeout(state.analysis_timeout, state.analyzer.analyze(from, to))
        .await
        .unwrap_or_else(|_| Err(AppError::analysis_timeout(state.analysis_timeout.as_secs())));

    match outcome {
        Ok(result) => {
            let data = AddressCheckData::from_analysis(result, req.include_raw);
            if data.is_risky {
                warn!("🚨 {} flagged: {} ({}/100)", to, data.message, data.risk_level);
            }
            Ok(Json(ApiResponse::success(
                data,
                start.elapsed().as_secs_f64() * 1000.0,
            )))
        }
        Err(e) => {
            error!("❌ Analysis failed for {} → {}: {}", from, to, e);
            Err(error_reply(&e, start))
        }
    }
}
