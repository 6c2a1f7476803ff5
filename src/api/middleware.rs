//! API Middleware (Auth, Rate Limiting, Logging)

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::types::{error_reply, ErrorReply};
use crate::models::errors::{AppError, AppResult};

/// Comma-separated list of accepted API keys; auth is off when unset
pub const API_KEYS_ENV: &str = "POISON_SHIELD_API_KEYS";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Rate limiter configuration
pub struct RateLimitConfig {
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration
    pub window_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 60,
            window_duration: Duration::from_secs(60),
        }
    }
}

/// In-memory fixed-window rate limiter
pub struct RateLimiter {
    /// Request counts per API key or client IP
    requests: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Check if request is allowed, returns (allowed, remaining, reset_seconds)
    pub fn check(&self, key: &str) -> (bool, u32, u64) {
        let now = Instant::now();

        let mut entry = self.requests.entry(key.to_string()).or_insert((0, now));

        if now.duration_since(entry.1) > self.config.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        let reset_secs = self
            .config
            .window_duration
            .saturating_sub(now.duration_since(entry.1))
            .as_secs();

        if entry.0 >= self.config.requests_per_window {
            return (false, 0, reset_secs);
        }

        entry.0 += 1;
        let remaining = self.config.requests_per_window - entry.0;
        (true, remaining, reset_secs)
    }

    /// Drop windows that ended long ago
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.requests.retain(|_, (_, timestamp)| {
            now.duration_since(*timestamp) < self.config.window_duration * 2
        });
    }

    pub fn tracked_keys(&self) -> usize {
        self.requests.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

lazy_static::lazy_static! {
    pub static ref RATE_LIMITER: Arc<RateLimiter> = Arc::new(RateLimiter::default());

    static ref API_KEYS: Option<HashSet<String>> = std::env::var(API_KEYS_ENV)
        .ok()
        .map(|raw| parse_api_keys(&raw))
        .filter(|keys| !keys.is_empty());
}

fn parse_api_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Periodically evict stale rate-limit windows
pub fn start_cleanup_task() {
    tokio::spawn(async {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            RATE_LIMITER.cleanup();
        }
    });
}

fn is_health_path(path: &str) -> bool {
    path == "/health" || path == "/v1/health"
}

fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-api-key").and_then(|v| v.to_str().ok())
}

/// Accept the request when auth is off or the key is configured
fn check_api_key(allowed: Option<&HashSet<String>>, key: Option<&str>) -> AppResult<()> {
    let Some(allowed) = allowed else {
        return Ok(());
    };

    match key {
        Some(key) if allowed.contains(key) => Ok(()),
        Some(_) => {
            warn!("Invalid API key attempted");
            Err(AppError::unauthorized())
        }
        None => Err(AppError::unauthorized()),
    }
}

/// Rate-limit bucket: a configured API key, otherwise the client IP.
///
/// Unverified keys never get their own bucket.
fn rate_limit_key(headers: &HeaderMap, allowed: Option<&HashSet<String>>) -> String {
    let verified_key = api_key(headers).filter(|key| allowed.is_some_and(|keys| keys.contains(*key)));

    verified_key
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .or_else(|| headers.get("x-real-ip"))
                .and_then(|v| v.to_str().ok())
        })
        .unwrap_or("unknown")
        .to_string()
}

/// API key authentication middleware
pub async fn auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ErrorReply> {
    let start = Instant::now();

    if is_health_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    check_api_key(API_KEYS.as_ref(), api_key(&headers)).map_err(|e| error_reply(&e, start))?;

    Ok(next.run(request).await)
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ErrorReply> {
    let start = Instant::now();

    if is_health_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let rate_key = rate_limit_key(&headers, API_KEYS.as_ref());

    let (allowed, remaining, reset) = RATE_LIMITER.check(&rate_key);

    if !allowed {
        warn!(key = %rate_key, "Rate limit exceeded");
        return Err(error_reply(&AppError::rate_limited(reset), start));
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Remaining", remaining.into());
    headers.insert("X-RateLimit-Reset", reset.into());

    Ok(response)
}

/// Request logging middleware, tags every response with a request id
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
