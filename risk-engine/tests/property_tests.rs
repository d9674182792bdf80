//! Property-based tests for scoring invariants
//!
//! These tests verify properties that must hold for every transaction,
//! not just specific test cases.

use proptest::prelude::*;
use risk_engine::*;
use rust_decimal::Decimal;

const LOCATIONS: [&str; 6] = [
    "Home City",
    "Nearby City",
    "Different State",
    "Abroad",
    "High Risk Area",
    "",
];

const DEVICES: [&str; 5] = ["Mobile", "Web", "ATM", "In-Person", "Card"];

fn transaction_strategy() -> impl Strategy<Value = TransactionInput> {
    (
        -1_000_000i64..10_000_000i64,
        -48i64..72i64,
        prop::sample::select(LOCATIONS.to_vec()),
        prop::sample::select(DEVICES.to_vec()),
        -10i64..400i64,
        0i64..50i64,
    )
        .prop_map(|(cents, time, location, device, days_since, today)| TransactionInput {
            amount: Decimal::new(cents, 2),
            time,
            merchant: "Online".to_string(),
            location: location.to_string(),
            transaction_type: "Credit".to_string(),
            device: device.to_string(),
            days_since,
            transactions_today: today,
        })
}

// ============================================================================
// Score Invariants
// ============================================================================

proptest! {
    /// Property: score always lands in [1, 99]
    #[test]
    fn score_is_clamped(input in transaction_strategy()) {
        let assessment = RiskScorer::new().assess(&input);
        let score = assessment.risk_score.score();

        prop_assert!((MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&score));
    }

    /// Property: is_fraud holds exactly when the score is above 60
    #[test]
    fn fraud_flag_matches_threshold(input in transaction_strategy()) {
        let assessment = RiskScorer::new().assess(&input);

        prop_assert_eq!(assessment.is_fraud, assessment.risk_score.score() > 60);
        prop_assert_eq!(
            assessment.verdict == Verdict::FraudDetected,
            assessment.is_fraud
        );
    }

    /// Property: reasons are never empty
    #[test]
    fn reasons_never_empty(input in transaction_strategy()) {
        let assessment = RiskScorer::new().assess(&input);

        prop_assert!(!assessment.reasons.is_empty());
        if assessment.reasons.contains(&RiskReason::NormalPattern) {
            prop_assert_eq!(assessment.reasons.len(), 1);
            prop_assert_eq!(assessment.risk_score.score(), 10);
        }
    }

    /// Property: the two location rules never fire together
    #[test]
    fn location_rules_exclusive(input in transaction_strategy()) {
        let assessment = RiskScorer::new().assess(&input);

        prop_assert!(
            !(assessment.reasons.contains(&RiskReason::Abroad)
                && assessment.reasons.contains(&RiskReason::HighRiskArea))
        );
    }

    /// Property: the noise source never changes the decision
    #[test]
    fn noise_does_not_affect_decision(
        input in transaction_strategy(),
        a in 0u8..=255u8,
        b in 0u8..=255u8,
        u in 0.0f64..1.0f64,
    ) {
        let first = RiskScorer::with_noise(FixedNoise::new(a, u)).assess(&input);
        let second = RiskScorer::with_noise(FixedNoise::new(b, 1.0 - u)).assess(&input);

        prop_assert_eq!(first.risk_score, second.risk_score);
        prop_assert_eq!(first.verdict, second.verdict);
        prop_assert_eq!(first.reasons, second.reasons);
    }
}
