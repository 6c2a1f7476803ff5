//! Providers Module - External Data Sources
//!
//! The `HistoryFetcher` boundary and its Solscan implementation.

pub mod fetcher;
pub mod solscan;

pub use fetcher::*;
pub use solscan::*;
