//! PoisonShield API Server
//!
//! REST API for Solana address-poisoning checks
//!
//! Usage:
//!   cargo run --bin poison_shield_api
//!
//! Environment:
//!   SOLSCAN_API_TOKEN          - Solscan Pro API token (required)
//!   PORT / POISON_SHIELD_PORT  - Server port (default: 8080)
//!   POISON_SHIELD_HOST         - Server host (default: 0.0.0.0)
//!   POISON_SHIELD_TIMEOUT_SECS - Per-request analysis timeout (default: 30)
//!   POISON_SHIELD_API_KEYS     - Comma-separated API keys (auth off when unset)
//!   RUST_LOG                   - Log level (default: info)

use poison_shield::api::{create_router, handlers::AppState, start_cleanup_task};
use poison_shield::{AnalyzerConfig, PoisoningAnalyzer, ServerConfig, SolscanClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let server = ServerConfig::from_env();
    let fetcher = Arc::new(SolscanClient::from_env()?);
    let analyzer = PoisoningAnalyzer::new(fetcher, AnalyzerConfig::default());

    let state = Arc::new(AppState::new(analyzer, server.analysis_timeout));

    start_cleanup_task();
    info!("🧹 Rate limiter cleanup task started");

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;

    info!("🛡️ PoisonShield API starting on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /v1/check-addresses  - Address poisoning check");
    info!("  GET  /v1/health           - Health check");
    info!("Analysis timeout: {}s", server.analysis_timeout.as_secs());

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("👋 PoisonShield API shutdown complete");

    Ok(())
}
