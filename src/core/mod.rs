//! Core Module - Address Similarity & Provenance Risk Engine
//!
//! Pure engine (extractor, provenance, similarity, scoring) plus the
//! analyzer that feeds it from a history fetcher.

pub mod analyzer;
pub mod extractor;
pub mod provenance;
pub mod risk_score;
pub mod similarity;

pub use analyzer::*;
pub use extractor::*;
pub use provenance::*;
pub use risk_score::*;
pub use similarity::*;
