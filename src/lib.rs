//! Poison Shield Library
//!
//! Detects address-poisoning on Solana: given a sender and a destination,
//! finds look-alike addresses among the sender's counterparties, picks the
//! genuine one by first-seen block, and scores the destination 0-100.

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    build_provenance, extract_addresses, find_similar, PoisoningAnalyzer, ProvenanceIndex,
    RiskScorer,
};
pub use models::{
    AnalysisResult, AnalyzerConfig, AppError, AppResult, BlockId, Confidence, ErrorCode,
    ProvenanceEntry, RiskAssessment, RiskFactor, RiskLevel, ServerConfig, SolscanConfig,
    TransactionRecord, TransferRecord,
};
pub use providers::{HistoryFetcher, SolscanClient};
