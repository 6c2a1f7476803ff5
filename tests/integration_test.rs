//! Integration tests for the poisoning analyzer

mod common;

use common::*;
use poison_shield::core::risk_score::{MSG_LOW_VALUE_NATIVE, MSG_NO_RISK, MSG_ORIGINAL};
use poison_shield::{
    AnalyzerConfig, Confidence, ErrorCode, PoisoningAnalyzer, RiskFactor, RiskLevel,
    TransactionRecord,
};
use std::sync::Arc;

fn analyzer(fetcher: MockFetcher) -> PoisoningAnalyzer {
    PoisoningAnalyzer::new(Arc::new(fetcher), AnalyzerConfig::default())
}

#[tokio::test]
async fn test_dust_impostor_is_flagged() {
    let fetcher = MockFetcher::new().with_transfers(SOURCE, dusted_history());

    let result = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap();
    let assessment = &result.risk_assessment;

    assert!(assessment.is_risky);
    assert_eq!(assessment.risk_level, 90);
    assert_eq!(assessment.level(), RiskLevel::Critical);
    assert_eq!(assessment.original_address.as_deref(), Some(ORIGINAL));
    assert_eq!(assessment.confidence, Confidence::High);
    assert!(assessment.message.contains(MSG_LOW_VALUE_NATIVE));
    assert_eq!(result.similar_addresses, vec![IMPOSTOR.to_string(), ORIGINAL.to_string()]);
}

#[tokio::test]
async fn test_original_address_is_not_flagged() {
    let fetcher = MockFetcher::new().with_transfers(SOURCE, dusted_history());

    let result = analyzer(fetcher).analyze(SOURCE, ORIGINAL).await.unwrap();

    assert!(!result.risk_assessment.is_risky);
    assert_eq!(result.risk_assessment.risk_level, 0);
    assert_eq!(result.risk_assessment.message, MSG_ORIGINAL);
    assert_eq!(result.risk_assessment.original_address.as_deref(), Some(ORIGINAL));
}

#[tokio::test]
async fn test_single_lookalike_is_safe() {
    let fetcher = MockFetcher::new().with_transfers(
        SOURCE,
        vec![transfer(SOURCE, ORIGINAL, Some(100), USDC, Some(5.0))],
    );

    let result = analyzer(fetcher).analyze(SOURCE, ORIGINAL).await.unwrap();

    assert!(!result.risk_assessment.is_risky);
    assert_eq!(result.risk_assessment.message, MSG_NO_RISK);
    assert_eq!(result.similar_addresses, vec![ORIGINAL.to_string()]);
}

#[tokio::test]
async fn test_unrelated_destination_is_safe() {
    let fetcher = MockFetcher::new().with_transfers(SOURCE, dusted_history());

    let result = analyzer(fetcher).analyze(SOURCE, UNRELATED).await.unwrap();

    assert!(!result.risk_assessment.is_risky);
    assert!(result.similar_addresses.is_empty());
}

#[tokio::test]
async fn test_value_disparity_escalates() {
    let fetcher = MockFetcher::new().with_transfers(
        SOURCE,
        vec![
            transfer(SOURCE, ORIGINAL, Some(100), USDC, Some(5.0)),
            transfer(IMPOSTOR, SOURCE, Some(150), USDC, Some(0.5)),
        ],
    );

    let result = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap();
    let assessment = &result.risk_assessment;

    assert!(assessment.is_risky);
    assert_eq!(assessment.risk_level, 90);
    assert!(assessment
        .factors
        .iter()
        .any(|f| matches!(f, RiskFactor::ValueDisparity { .. })));
}

#[tokio::test]
async fn test_comparable_values_keep_base_level() {
    let fetcher = MockFetcher::new().with_transfers(
        SOURCE,
        vec![
            transfer(SOURCE, ORIGINAL, Some(100), USDC, Some(5.0)),
            transfer(IMPOSTOR, SOURCE, Some(150), USDC, Some(4.0)),
        ],
    );

    let result = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap();

    assert!(result.risk_assessment.is_risky);
    assert_eq!(result.risk_assessment.risk_level, 40);
}

#[tokio::test]
async fn test_unknown_blocks_are_indeterminate() {
    let fetcher = MockFetcher::new().with_transfers(
        SOURCE,
        vec![
            transfer(SOURCE, ORIGINAL, None, USDC, Some(5.0)),
            transfer(IMPOSTOR, SOURCE, None, USDC, Some(0.1)),
        ],
    );

    let result = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap();

    assert!(!result.risk_assessment.is_risky);
    assert_eq!(result.risk_assessment.confidence, Confidence::Low);
    assert!(result.risk_assessment.original_address.is_none());
}

#[tokio::test]
async fn test_destination_outside_history() {
    // Look-alikes from signers only, destination never transacted with the source
    let fetcher = MockFetcher::new()
        .with_transfers(SOURCE, dusted_history())
        .with_transactions(
            SOURCE,
            vec![TransactionRecord {
                signers: vec![OTHER.to_string()],
                ..Default::default()
            }],
        );

    let newcomer = "ABCDnewcomer5555555555555555555555555555555";
    let result = analyzer(fetcher).analyze(SOURCE, newcomer).await.unwrap();
    let assessment = &result.risk_assessment;

    assert_eq!(assessment.similar_addresses.len(), 3);
    assert!(assessment.is_risky);
    assert_eq!(assessment.risk_level, 60);
    assert_eq!(assessment.confidence, Confidence::Medium);
    assert_eq!(assessment.original_address.as_deref(), Some(ORIGINAL));
}

#[tokio::test]
async fn test_fetch_order_does_not_change_result() {
    let mut history = dusted_history();
    history.push(transfer(SOURCE, OTHER, Some(300), USDC, Some(1.0)));
    let mut reversed = history.clone();
    reversed.reverse();

    let forward = analyzer(MockFetcher::new().with_transfers(SOURCE, history))
        .analyze(SOURCE, IMPOSTOR)
        .await
        .unwrap();
    let backward = analyzer(MockFetcher::new().with_transfers(SOURCE, reversed))
        .analyze(SOURCE, IMPOSTOR)
        .await
        .unwrap();

    assert_eq!(forward.risk_assessment, backward.risk_assessment);
}

#[tokio::test]
async fn test_fetch_failure_aborts_analysis() {
    let fetcher = MockFetcher::new()
        .with_transfers(SOURCE, dusted_history())
        .failing_transactions_for(IMPOSTOR);

    let err = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::FetchFailed);
    assert!(err.is_fetch_failure());
    assert!(err.message.contains("transactions for"));
    assert!(err.message.contains(IMPOSTOR));
}

#[tokio::test]
async fn test_raw_data_is_kept() {
    let fetcher = MockFetcher::new().with_transfers(SOURCE, dusted_history());

    let result = analyzer(fetcher).analyze(SOURCE, IMPOSTOR).await.unwrap();

    assert_eq!(result.from_address_data.address, SOURCE);
    assert_eq!(result.from_address_data.transfers.len(), 2);
    assert!(result.to_address_data.transfers.is_empty());
    assert!(result.from_address_data.related_addresses.contains(&IMPOSTOR.to_string()));
    assert!(result.summary().contains(ORIGINAL));
}
