//! Risk Scoring Module
//!
//! Decides which look-alike address is the genuine one (earliest provenance)
//! and scores the destination 0-100:
//! - 0: destination is the original, or nothing resembles it
//! - 20 per look-alike (capped at 100) when the destination is an impostor
//! - at least 90 when the impostor's first transfer looks like a poisoning
//!   probe (native dust, or far less value than the original moved)
//!
//! Missing data never raises: unknown blocks never win "earliest", and
//! value escalation is skipped (and noted) when the values are missing.

use tracing::debug;

use crate::core::provenance::ProvenanceIndex;
use crate::core::similarity::prefix_of;
use crate::models::config::AnalyzerConfig;
use crate::models::types::{
    Address, BlockId, Confidence, ProvenanceEntry, RiskAssessment, RiskFactor, TransferRecord,
};
use crate::utils::constants::MAX_RISK;

pub const MSG_NO_RISK: &str = "no risk detected";
pub const MSG_ORIGINAL: &str = "original address detected";
pub const MSG_LOW_VALUE_NATIVE: &str = "low value native-token transaction";

/// Scores a destination against its look-alikes
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: AnalyzerConfig,
}

impl RiskScorer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score `target` given the matcher output and the source's provenance index.
    ///
    /// `matches` is expected in matcher order; among equally early matches
    /// the first one wins.
    pub fn score(
        &self,
        target: &str,
        matches: &[Address],
        provenance: &ProvenanceIndex,
    ) -> RiskAssessment {
        if matches.len() <= 1 {
            return RiskAssessment::safe(MSG_NO_RISK, matches.to_vec());
        }

        let mut factors = vec![RiskFactor::SimilarAddresses {
            count: matches.len(),
            prefix: prefix_of(target, self.config.prefix_length()).to_string(),
        }];

        // min_by_key keeps the first of equal minimums
        let earliest = matches
            .iter()
            .filter_map(|address| {
                provenance
                    .get(address)
                    .filter(|entry| entry.earliest_block.is_known())
                    .map(|entry| (address, entry))
            })
            .min_by_key(|(_, entry)| entry.earliest_block);

        let Some((original, original_entry)) = earliest else {
            factors.push(RiskFactor::IndeterminateProvenance {
                similar_count: matches.len(),
            });
            return RiskAssessment {
                is_risky: false,
                risk_level: 0,
                message: format!(
                    "provenance indeterminate: {} similar addresses found but none has block data",
                    matches.len()
                ),
                original_address: None,
                similar_addresses: matches.to_vec(),
                confidence: Confidence::Low,
                factors,
            };
        };

        if original.as_str() == target {
            return RiskAssessment {
                is_risky: false,
                risk_level: 0,
                message: MSG_ORIGINAL.to_string(),
                original_address: Some(original.clone()),
                similar_addresses: matches.to_vec(),
                confidence: Confidence::High,
                factors,
            };
        }

        let target_entry = provenance.get(target);
        let target_block = target_entry
            .map(|e| e.earliest_block)
            .unwrap_or(BlockId::Unknown);

        factors.push(RiskFactor::ImpostorAddress {
            original: original.clone(),
            original_block: original_entry.earliest_block,
            target_block,
        });

        let base = matches
            .len()
            .saturating_mul(self.config.risk_per_match as usize)
            .min(MAX_RISK as usize) as u8;

        let mut scored = Scored {
            level: base,
            message: format!(
                "possible address poisoning: destination resembles original address {}",
                original
            ),
            factors,
        };

        let confidence = match target_entry {
            Some(entry) if entry.earliest_block.is_known() => {
                self.escalate(entry, original_entry, &mut scored);
                Confidence::High
            }
            Some(entry) => {
                self.escalate(entry, original_entry, &mut scored);
                Confidence::Medium
            }
            None => {
                scored.degrade("destination has no transfer with the source, value comparison skipped");
                Confidence::Medium
            }
        };

        debug!(
            "Scored {}: level {} (base {}), original {}",
            target, scored.level, base, original
        );

        RiskAssessment {
            is_risky: true,
            risk_level: scored.level.min(MAX_RISK),
            message: scored.message,
            original_address: Some(original.clone()),
            similar_addresses: matches.to_vec(),
            confidence,
            factors: scored.factors,
        }
    }

    /// Value-magnitude escalation. Native dust rule first, then same-token disparity.
    fn escalate(&self, target: &ProvenanceEntry, original: &ProvenanceEntry, scored: &mut Scored) {
        let target_tx: &TransferRecord = &target.originating_transfer;
        let original_tx: &TransferRecord = &original.originating_transfer;

        let Some(target_value) = target_tx.value else {
            scored.degrade("destination transfer has no value, value comparison skipped");
            return;
        };

        let target_token = target_tx.token_address.as_deref();

        if target_token == Some(self.config.native_token.as_str()) {
            if target_value < self.config.dust_threshold {
                scored.raise(self.config.escalated_risk);
                scored.message.push_str("; ");
                scored.message.push_str(MSG_LOW_VALUE_NATIVE);
                scored.factors.push(RiskFactor::DustNativeTransfer {
                    value: target_value,
                    threshold: self.config.dust_threshold,
                });
            }
            return;
        }

        let (Some(token), Some(original_token)) = (target_token, original_tx.token_address.as_deref())
        else {
            return;
        };
        if token != original_token {
            return;
        }

        if original_tx.value.is_none() {
            scored.degrade("original transfer has no value, treated as zero");
        }
        let original_value = original_tx.value_or_zero();

        if target_value < original_value / self.config.disparity_ratio {
            scored.raise(self.config.escalated_risk);
            scored.message.push_str(&format!(
                "; value disparity: destination moved {} vs original {} of token {}",
                target_value, original_value, token
            ));
            scored.factors.push(RiskFactor::ValueDisparity {
                token: token.to_string(),
                target_value,
                original_value,
            });
        }
    }
}

/// Mutable score state while escalating
struct Scored {
    level: u8,
    message: String,
    factors: Vec<RiskFactor>,
}

impl Scored {
    fn raise(&mut self, floor: u8) {
        self.level = self.level.max(floor);
    }

    fn degrade(&mut self, reason: &str) {
        self.message.push_str(" (");
        self.message.push_str(reason);
        self.message.push(')');
        self.factors.push(RiskFactor::DegradedRecord {
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provenance::build_provenance;
    use crate::utils::constants::NATIVE_SOL_TOKEN;

    const SOURCE: &str = "Src0000000000000000000000000000000000000000";
    const ORIGINAL: &str = "AbCd1110000000000000000000000000000000000000";
    const IMPOSTOR: &str = "AbCd9990000000000000000000000000000000000000";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn transfer(to: &str, block: Option<u64>, token: Option<&str>, value: Option<f64>) -> TransferRecord {
        TransferRecord {
            source: Some(SOURCE.to_string()),
            destination: Some(to.to_string()),
            block_id: BlockId::from_option(block),
            block_time: block.map(|b| 1_700_000_000 + b as i64),
            token_address: token.map(String::from),
            value,
            signature: Some(format!("sig-{}-{:?}", to, block)),
            activity_type: Some("ACTIVITY_SPL_TRANSFER".to_string()),
        }
    }

    fn matches(items: &[&str]) -> Vec<Address> {
        let mut v: Vec<Address> = items.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_impostor_base_score() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(100.0)),
            transfer(IMPOSTOR, Some(20), Some(USDC), Some(90.0)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(result.is_risky);
        assert_eq!(result.risk_level, 40);
        assert_eq!(result.original_address.as_deref(), Some(ORIGINAL));
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_original_not_risky() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(100.0)),
            transfer(IMPOSTOR, Some(20), Some(NATIVE_SOL_TOKEN), Some(0.00001)),
        ]);

        let result = RiskScorer::default().score(ORIGINAL, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(!result.is_risky);
        assert_eq!(result.risk_level, 0);
        assert_eq!(result.message, MSG_ORIGINAL);
    }

    #[test]
    fn test_native_dust_escalates() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(NATIVE_SOL_TOKEN), Some(2.0)),
            transfer(IMPOSTOR, Some(20), Some(NATIVE_SOL_TOKEN), Some(0.0001)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert_eq!(result.risk_level, 90);
        assert!(result.message.contains(MSG_LOW_VALUE_NATIVE));
        assert!(result
            .factors
            .iter()
            .any(|f| matches!(f, RiskFactor::DustNativeTransfer { .. })));
    }

    #[test]
    fn test_native_above_dust_not_escalated() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(NATIVE_SOL_TOKEN), Some(2.0)),
            transfer(IMPOSTOR, Some(20), Some(NATIVE_SOL_TOKEN), Some(0.01)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        // Native branch is exclusive: no disparity check even though 0.01 < 2.0 / 5
        assert_eq!(result.risk_level, 40);
    }

    #[test]
    fn test_same_token_disparity_escalates() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(500.0)),
            transfer(IMPOSTOR, Some(20), Some(USDC), Some(1.0)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert_eq!(result.risk_level, 90);
        assert!(result.message.contains("value disparity"));
        assert!(result.message.contains("500"));
        assert!(result.message.contains('1'));
    }

    #[test]
    fn test_different_tokens_no_disparity() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(500.0)),
            transfer(IMPOSTOR, Some(20), Some("OtherMint1111"), Some(1.0)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);
        assert_eq!(result.risk_level, 40);
    }

    #[test]
    fn test_tokenless_target_is_neither_native_nor_same_token() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(500.0)),
            transfer(IMPOSTOR, Some(20), None, Some(0.0001)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(result.is_risky);
        assert_eq!(result.risk_level, 40);
        assert!(!result.message.contains(MSG_LOW_VALUE_NATIVE));
    }

    #[test]
    fn test_tokenless_original_never_same_token() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), None, Some(500.0)),
            transfer(IMPOSTOR, Some(20), Some(USDC), Some(0.0001)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(result.is_risky);
        assert_eq!(result.risk_level, 40);
        assert!(!result
            .factors
            .iter()
            .any(|f| matches!(f, RiskFactor::ValueDisparity { .. })));
    }

    #[test]
    fn test_single_match_not_risky() {
        let provenance = build_provenance(&[transfer(IMPOSTOR, Some(20), None, None)]);
        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[IMPOSTOR]), &provenance);

        assert!(!result.is_risky);
        assert_eq!(result.risk_level, 0);
        assert_eq!(result.message, MSG_NO_RISK);
        assert!(result.original_address.is_none());

        let empty = RiskScorer::default().score(IMPOSTOR, &[], &provenance);
        assert!(!empty.is_risky);
    }

    #[test]
    fn test_no_provenance_is_indeterminate() {
        let provenance = ProvenanceIndex::new();
        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(!result.is_risky);
        assert_eq!(result.risk_level, 0);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.message.contains("indeterminate"));
        assert_eq!(result.similar_addresses.len(), 2);
    }

    #[test]
    fn test_unknown_blocks_are_indeterminate() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, None, Some(USDC), Some(1.0)),
            transfer(IMPOSTOR, None, Some(USDC), Some(1.0)),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);
        assert!(!result.is_risky);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_tie_goes_to_first_in_matcher_order() {
        let provenance = build_provenance(&[
            transfer(IMPOSTOR, Some(10), Some(USDC), Some(1.0)),
            transfer(ORIGINAL, Some(10), Some(USDC), Some(1.0)),
        ]);

        // ORIGINAL sorts before IMPOSTOR lexicographically
        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);
        assert_eq!(result.original_address.as_deref(), Some(ORIGINAL));
        assert!(result.is_risky);

        let result = RiskScorer::default().score(ORIGINAL, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);
        assert!(!result.is_risky);
    }

    #[test]
    fn test_target_without_provenance_is_medium_confidence() {
        let provenance = build_provenance(&[transfer(ORIGINAL, Some(10), Some(USDC), Some(1.0))]);
        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);

        assert!(result.is_risky);
        assert_eq!(result.risk_level, 40);
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.message.contains("value comparison skipped"));
    }

    #[test]
    fn test_missing_value_skips_escalation() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(NATIVE_SOL_TOKEN), Some(1.0)),
            transfer(IMPOSTOR, Some(20), Some(NATIVE_SOL_TOKEN), None),
        ]);

        let result = RiskScorer::default().score(IMPOSTOR, &matches(&[ORIGINAL, IMPOSTOR]), &provenance);
        assert_eq!(result.risk_level, 40);
        assert!(result
            .factors
            .iter()
            .any(|f| matches!(f, RiskFactor::DegradedRecord { .. })));
    }

    #[test]
    fn test_risk_level_bounded() {
        let mut transfers = Vec::new();
        let mut addrs = Vec::new();
        for i in 0..8u64 {
            let addr = format!("AbCd{:040}", i);
            transfers.push(transfer(&addr, Some(100 + i), Some(NATIVE_SOL_TOKEN), Some(0.00001)));
            addrs.push(addr);
        }
        addrs.sort();
        let provenance = build_provenance(&transfers);
        let target = addrs.last().unwrap().clone();

        let result = RiskScorer::default().score(&target, &addrs, &provenance);
        assert!(result.is_risky);
        // 8 * 20 capped at 100, dust escalation never lowers it
        assert_eq!(result.risk_level, 100);
    }

    #[test]
    fn test_score_is_idempotent() {
        let provenance = build_provenance(&[
            transfer(ORIGINAL, Some(10), Some(USDC), Some(500.0)),
            transfer(IMPOSTOR, Some(20), Some(USDC), Some(1.0)),
        ]);
        let scorer = RiskScorer::default();
        let m = matches(&[ORIGINAL, IMPOSTOR]);

        assert_eq!(scorer.score(IMPOSTOR, &m, &provenance), scorer.score(IMPOSTOR, &m, &provenance));
    }
}
