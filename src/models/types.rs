//! Type definitions for Poison Shield
//! Transfer/transaction records, provenance entries and risk results

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

/// Ledger account identifier (base58 on Solana). Compared by exact string equality.
pub type Address = String;

/// Ledger position of a record.
///
/// `Unknown` orders after every `Known` slot, so a record without a block id
/// can never win an "earliest" comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockId {
    Known(u64),
    Unknown,
}

impl BlockId {
    pub fn from_option(slot: Option<u64>) -> Self {
        slot.map(BlockId::Known).unwrap_or(BlockId::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, BlockId::Known(_))
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            BlockId::Known(slot) => Some(*slot),
            BlockId::Unknown => None,
        }
    }
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::Unknown
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockId::Known(slot) => write!(f, "{}", slot),
            BlockId::Unknown => write!(f, "unknown"),
        }
    }
}

/// A value-movement event. Every field may be missing in provider data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub source: Option<Address>,
    pub destination: Option<Address>,
    pub block_id: BlockId,
    /// Unix seconds
    pub block_time: Option<i64>,
    pub token_address: Option<Address>,
    /// Decimal (UI) amount, already scaled by the token's decimals
    pub value: Option<f64>,
    pub signature: Option<String>,
    pub activity_type: Option<String>,
}

impl TransferRecord {
    /// Addresses this transfer touches (source first, then destination)
    pub fn touched(&self) -> impl Iterator<Item = &Address> {
        self.source
            .iter()
            .chain(self.destination.iter())
            .filter(|a| !a.is_empty())
    }

    /// Value with the zero default for missing amounts
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// Total order used to pick one originating transfer among records that
    /// share a block, independent of the order they were fetched in.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.block_id
            .cmp(&other.block_id)
            .then_with(|| cmp_missing_last(&self.block_time, &other.block_time))
            .then_with(|| cmp_missing_last(&self.signature, &other.signature))
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.destination.cmp(&other.destination))
            .then_with(|| self.token_address.cmp(&other.token_address))
            .then_with(|| self.activity_type.cmp(&other.activity_type))
            .then_with(|| {
                self.value_or_zero()
                    .partial_cmp(&other.value_or_zero())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

fn cmp_missing_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A signed transaction; only its signers matter to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signers: Vec<Address>,
    pub signature: Option<String>,
    pub slot: BlockId,
    pub block_time: Option<i64>,
    pub status: Option<String>,
}

/// Earliest sighting of an address within the indexed transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    pub earliest_block: BlockId,
    pub earliest_time: Option<i64>,
    pub originating_transfer: TransferRecord,
}

impl ProvenanceEntry {
    pub fn from_transfer(transfer: &TransferRecord) -> Self {
        Self {
            earliest_block: transfer.block_id,
            earliest_time: transfer.block_time,
            originating_transfer: transfer.clone(),
        }
    }
}

/// How much the assessment can be trusted given the data it was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        }
    }
}

/// Risk band derived from a 0-100 risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => RiskLevel::Safe,
            21..=40 => RiskLevel::Low,
            41..=60 => RiskLevel::Medium,
            61..=80 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "✅",
            RiskLevel::Low => "🟡",
            RiskLevel::Medium => "🟠",
            RiskLevel::High => "🔴",
            RiskLevel::Critical => "💀",
        }
    }

    /// Color code for UI
    pub fn color_code(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "#22c55e",
            RiskLevel::Low => "#eab308",
            RiskLevel::Medium => "#f97316",
            RiskLevel::High => "#ef4444",
            RiskLevel::Critical => "#7c2d12",
        }
    }
}

/// Evidence that contributed to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFactor {
    /// Several addresses share the destination's prefix
    SimilarAddresses { count: usize, prefix: String },
    /// Destination is not the earliest-seen look-alike
    ImpostorAddress {
        original: Address,
        original_block: BlockId,
        target_block: BlockId,
    },
    /// Destination first appeared via a native-token dust transfer
    DustNativeTransfer { value: f64, threshold: f64 },
    /// Destination's first transfer is far smaller than the original's
    ValueDisparity {
        token: Address,
        target_value: f64,
        original_value: f64,
    },
    /// Look-alikes exist but none has usable block data
    IndeterminateProvenance { similar_count: usize },
    /// A record lacked fields and defaults were substituted
    DegradedRecord { reason: String },
}

impl RiskFactor {
    pub fn description(&self) -> String {
        match self {
            RiskFactor::SimilarAddresses { count, prefix } => {
                format!("{} addresses share prefix '{}'", count, prefix)
            }
            RiskFactor::ImpostorAddress {
                original,
                original_block,
                target_block,
            } => format!(
                "Original {} first seen at block {}, destination at block {}",
                original, original_block, target_block
            ),
            RiskFactor::DustNativeTransfer { value, threshold } => {
                format!("Native transfer of {} below dust threshold {}", value, threshold)
            }
            RiskFactor::ValueDisparity {
                token,
                target_value,
                original_value,
            } => format!(
                "Token {}: destination moved {} vs original {}",
                token, target_value, original_value
            ),
            RiskFactor::IndeterminateProvenance { similar_count } => format!(
                "{} similar addresses but no block data to rank them",
                similar_count
            ),
            RiskFactor::DegradedRecord { reason } => format!("Degraded data: {}", reason),
        }
    }
}

/// Outcome of scoring one destination address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub is_risky: bool,
    /// 0-100
    pub risk_level: u8,
    pub message: String,
    pub original_address: Option<Address>,
    pub similar_addresses: Vec<Address>,
    pub confidence: Confidence,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Non-risky assessment with no original address
    pub fn safe(message: impl Into<String>, similar_addresses: Vec<Address>) -> Self {
        Self {
            is_risky: false,
            risk_level: 0,
            message: message.into(),
            original_address: None,
            similar_addresses,
            confidence: Confidence::High,
            factors: Vec::new(),
        }
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_level)
    }
}

/// Raw per-address data kept for audit/debugging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressDetail {
    pub address: Address,
    pub transfers: Vec<TransferRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub related_addresses: Vec<Address>,
}

/// Result of analysing one (from, to) address pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub from_address_data: AddressDetail,
    pub to_address_data: AddressDetail,
    pub similar_addresses: Vec<Address>,
    pub risk_assessment: RiskAssessment,
    /// Analysis latency in milliseconds
    pub latency_ms: u64,
}

impl AnalysisResult {
    /// Set the analysis latency
    pub fn set_latency(&mut self, start: Instant) {
        self.latency_ms = start.elapsed().as_millis() as u64;
    }

    /// Pretty print the analysis result
    pub fn summary(&self) -> String {
        let assessment = &self.risk_assessment;
        let level = assessment.level();
        let mut output = format!(
            "\n{} Risk: {} ({}/100) | {}\n",
            level.emoji(),
            level.as_str(),
            assessment.risk_level,
            assessment.message
        );
        output.push_str(&format!("   From: {}\n", self.from_address_data.address));
        output.push_str(&format!("   To: {}\n", self.to_address_data.address));
        if let Some(original) = &assessment.original_address {
            output.push_str(&format!("   Original: {}\n", original));
        }
        output.push_str(&format!("   Confidence: {}\n", assessment.confidence.as_str()));
        output.push_str(&format!("   Latency: {}ms\n", self.latency_ms));

        if !assessment.factors.is_empty() {
            output.push_str("   Factors:\n");
            for factor in &assessment.factors {
                output.push_str(&format!("     - {}\n", factor.description()));
            }
        }

        output
    }
}
