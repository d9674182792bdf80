//! Risk scoring engine

use crate::noise::{NoiseSource, ThreadRngNoise};
use crate::{ModelAgreement, RiskAssessment, RiskReason, RiskScore, TransactionInput, Verdict};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Starting score before any rule fires
pub const BASE_SCORE: i64 = 10;

const HIGH_AMOUNT_THRESHOLD: Decimal = dec!(1000);
const DORMANT_AMOUNT_THRESHOLD: Decimal = dec!(500);
const DORMANT_DAYS_THRESHOLD: i64 = 30;

const HIGH_AMOUNT_POINTS: i64 = 30;
const UNUSUAL_TIME_POINTS: i64 = 20;
const ABROAD_POINTS: i64 = 35;
const HIGH_RISK_AREA_POINTS: i64 = 40;
const LATE_NIGHT_ATM_POINTS: i64 = 20;
const DORMANCY_POINTS: i64 = 15;

const CLASSICAL_CONFIDENCE: (u8, u8) = (85, 99);
const QUANTUM_CONFIDENCE: (u8, u8) = (75, 95);
const DIVERGE_PROBABILITY: f64 = 0.2;

/// Risk scorer
///
/// Applies a fixed set of additive rules. The score, verdict and reasons
/// depend only on the input; the confidence values and agreement label are
/// drawn from the injected [`NoiseSource`].
pub struct RiskScorer {
    noise: Box<dyn NoiseSource>,
}

impl RiskScorer {
    /// Create new risk scorer backed by the thread RNG
    pub fn new() -> Self {
        Self::with_noise(ThreadRngNoise)
    }

    /// Create a risk scorer with a specific noise source
    pub fn with_noise(noise: impl NoiseSource + 'static) -> Self {
        Self {
            noise: Box::new(noise),
        }
    }

    /// Assess a transaction
    pub fn assess(&self, input: &TransactionInput) -> RiskAssessment {
        let (raw_score, mut reasons) = Self::apply_rules(input);

        let risk_score = RiskScore::new(raw_score);
        let verdict = Verdict::from(risk_score);

        if reasons.is_empty() {
            reasons.push(RiskReason::NormalPattern);
        }

        let classical_confidence = self
            .noise
            .int_in(CLASSICAL_CONFIDENCE.0, CLASSICAL_CONFIDENCE.1);
        let quantum_confidence = self
            .noise
            .int_in(QUANTUM_CONFIDENCE.0, QUANTUM_CONFIDENCE.1);
        let agreement = if self.noise.unit() > DIVERGE_PROBABILITY {
            ModelAgreement::Agree
        } else {
            ModelAgreement::Diverge
        };

        tracing::debug!(
            score = risk_score.score(),
            verdict = %verdict,
            rules_fired = reasons.len(),
            "Transaction assessed"
        );

        RiskAssessment {
            risk_score,
            verdict,
            is_fraud: risk_score.is_fraud(),
            classical_confidence,
            quantum_confidence,
            agreement,
            reasons,
        }
    }

    /// Unclamped score and fired rules, in evaluation order
    fn apply_rules(input: &TransactionInput) -> (i64, Vec<RiskReason>) {
        let mut score = BASE_SCORE;
        let mut reasons = Vec::new();

        if input.amount > HIGH_AMOUNT_THRESHOLD {
            score += HIGH_AMOUNT_POINTS;
            reasons.push(RiskReason::HighAmount);
        }

        if (0..=6).contains(&input.time) {
            score += UNUSUAL_TIME_POINTS;
            reasons.push(RiskReason::UnusualTime);
        }

        // First matching location wins
        match input.location.as_str() {
            "Abroad" => {
                score += ABROAD_POINTS;
                reasons.push(RiskReason::Abroad);
            }
            "High Risk Area" => {
                score += HIGH_RISK_AREA_POINTS;
                reasons.push(RiskReason::HighRiskArea);
            }
            _ => {}
        }

        // Stacks with the unusual time rule
        if input.device == "ATM" && input.time < 6 {
            score += LATE_NIGHT_ATM_POINTS;
            reasons.push(RiskReason::LateNightAtm);
        }

        if input.days_since > DORMANT_DAYS_THRESHOLD && input.amount > DORMANT_AMOUNT_THRESHOLD {
            score += DORMANCY_POINTS;
            reasons.push(RiskReason::DormancyReactivation);
        }

        (score, reasons)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::FixedNoise;

    fn transaction(amount: i64, time: i64, location: &str, device: &str, days_since: i64) -> TransactionInput {
        TransactionInput {
            amount: Decimal::from(amount),
            time,
            merchant: "Grocery".to_string(),
            location: location.to_string(),
            transaction_type: "Debit".to_string(),
            device: device.to_string(),
            days_since,
            transactions_today: 0,
        }
    }

    fn scorer() -> RiskScorer {
        RiskScorer::with_noise(FixedNoise::new(90, 0.5))
    }

    #[test]
    fn test_normal_transaction() {
        let assessment = scorer().assess(&transaction(50, 14, "Home", "Card", 2));

        assert_eq!(assessment.risk_score.score(), 10);
        assert_eq!(assessment.verdict, Verdict::Legitimate);
        assert!(!assessment.is_fraud);
        assert_eq!(assessment.reasons, vec![RiskReason::NormalPattern]);
    }

    #[test]
    fn test_every_rule_fires() {
        let assessment = scorer().assess(&transaction(1500, 3, "Abroad", "ATM", 40));

        assert_eq!(
            assessment.reasons,
            vec![
                RiskReason::HighAmount,
                RiskReason::UnusualTime,
                RiskReason::Abroad,
                RiskReason::LateNightAtm,
                RiskReason::DormancyReactivation,
            ]
        );
        // 10 + 30 + 20 + 35 + 20 + 15 = 130
        assert_eq!(assessment.risk_score.score(), 99);
        assert_eq!(assessment.verdict, Verdict::FraudDetected);
        assert!(assessment.is_fraud);
    }

    #[test]
    fn test_high_risk_area_excludes_abroad() {
        let assessment = scorer().assess(&transaction(50, 14, "High Risk Area", "Card", 2));

        assert_eq!(assessment.reasons, vec![RiskReason::HighRiskArea]);
        assert_eq!(assessment.risk_score.score(), 50);
        assert_eq!(assessment.verdict, Verdict::ReviewNeeded);
    }

    #[test]
    fn test_unusual_time_bounds() {
        let scorer = scorer();

        let at_six = scorer.assess(&transaction(50, 6, "Home", "Card", 2));
        assert_eq!(at_six.reasons, vec![RiskReason::UnusualTime]);
        assert_eq!(at_six.risk_score.score(), 30);
        assert_eq!(at_six.verdict, Verdict::Legitimate);

        let at_seven = scorer.assess(&transaction(50, 7, "Home", "Card", 2));
        assert_eq!(at_seven.reasons, vec![RiskReason::NormalPattern]);
    }

    #[test]
    fn test_atm_rule_stops_at_six() {
        let scorer = scorer();

        let at_five = scorer.assess(&transaction(50, 5, "Home", "ATM", 2));
        assert_eq!(
            at_five.reasons,
            vec![RiskReason::UnusualTime, RiskReason::LateNightAtm]
        );
        assert_eq!(at_five.risk_score.score(), 50);

        let at_six = scorer.assess(&transaction(50, 6, "Home", "ATM", 2));
        assert_eq!(at_six.reasons, vec![RiskReason::UnusualTime]);
    }

    #[test]
    fn test_dormancy_needs_both_conditions() {
        let scorer = scorer();

        let dormant = scorer.assess(&transaction(600, 14, "Home", "Card", 31));
        assert_eq!(dormant.reasons, vec![RiskReason::DormancyReactivation]);
        assert_eq!(dormant.risk_score.score(), 25);

        let small = scorer.assess(&transaction(500, 14, "Home", "Card", 90));
        assert_eq!(small.reasons, vec![RiskReason::NormalPattern]);

        let recent = scorer.assess(&transaction(900, 14, "Home", "Card", 30));
        assert_eq!(recent.reasons, vec![RiskReason::NormalPattern]);
    }

    #[test]
    fn test_amount_threshold_is_exclusive() {
        let scorer = scorer();

        let at_limit = scorer.assess(&transaction(1000, 14, "Home", "Card", 2));
        assert_eq!(at_limit.risk_score.score(), 10);

        let mut over = transaction(1000, 14, "Home", "Card", 2);
        over.amount = Decimal::new(100001, 2);
        assert_eq!(scorer.assess(&over).reasons, vec![RiskReason::HighAmount]);
    }

    #[test]
    fn test_out_of_range_input_still_scores() {
        let assessment = scorer().assess(&transaction(-5_000, 48, "Mars", "Card", -3));

        assert_eq!(assessment.risk_score.score(), 10);
        assert_eq!(assessment.reasons, vec![RiskReason::NormalPattern]);
    }

    #[test]
    fn test_cosmetic_fields_follow_noise_source() {
        let agree = RiskScorer::with_noise(FixedNoise::new(80, 0.9))
            .assess(&transaction(50, 14, "Home", "Card", 2));
        assert_eq!(agree.classical_confidence, 85);
        assert_eq!(agree.quantum_confidence, 80);
        assert_eq!(agree.agreement, ModelAgreement::Agree);

        let diverge = RiskScorer::with_noise(FixedNoise::new(80, 0.2))
            .assess(&transaction(50, 14, "Home", "Card", 2));
        assert_eq!(diverge.agreement, ModelAgreement::Diverge);
        assert_eq!(diverge.risk_score, agree.risk_score);
        assert_eq!(diverge.verdict, agree.verdict);
    }

    #[test]
    fn test_default_scorer_confidence_ranges() {
        let scorer = RiskScorer::new();
        for _ in 0..200 {
            let assessment = scorer.assess(&transaction(50, 14, "Home", "Card", 2));
            assert!((85..=99).contains(&assessment.classical_confidence));
            assert!((75..=95).contains(&assessment.quantum_confidence));
        }
    }
}
