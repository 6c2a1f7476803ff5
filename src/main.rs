//! PoisonShield CLI - one-shot address poisoning check
//!
//! Usage:
//!   poison_shield <FROM> <TO> [--json] [--prefix-length N]
//!
//! Environment:
//!   SOLSCAN_API_TOKEN - Solscan Pro API token (required)
//!   RUST_LOG          - Log level (default: info)

use clap::Parser;
use eyre::Result;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poison_shield::{AnalyzerConfig, PoisoningAnalyzer, SolscanClient};

#[derive(Parser)]
#[command(name = "poison_shield")]
#[command(about = "Check whether a destination address impersonates a past counterparty", long_about = None)]
struct Cli {
    /// Sender whose history is searched for look-alikes
    from: String,

    /// Intended destination
    to: String,

    /// Print the full analysis as JSON
    #[arg(long, default_value = "false")]
    json: bool,

    /// Leading characters compared between addresses
    #[arg(long, default_value = "4")]
    prefix_length: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = AnalyzerConfig::default().with_prefix_length(cli.prefix_length)?;
    let fetcher = Arc::new(SolscanClient::from_env()?);
    let analyzer = PoisoningAnalyzer::new(fetcher, config);

    let result = analyzer.analyze(cli.from.trim(), cli.to.trim()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary());
    }

    Ok(())
}
