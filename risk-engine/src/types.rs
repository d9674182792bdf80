//! Core types for risk engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest score an assessment can carry
pub const MIN_RISK_SCORE: u8 = 1;

/// Highest score an assessment can carry
pub const MAX_RISK_SCORE: u8 = 99;

/// Transaction submitted for scoring
///
/// Fields are only checked for type. Out-of-range values (negative amounts,
/// hours past 23, numbers too large to represent) are accepted and simply
/// saturate or fail to trigger the rules that look at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Transaction amount
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "crate::lenient::decimal"
    )]
    pub amount: Decimal,

    /// Hour of day (0-23)
    #[serde(deserialize_with = "crate::lenient::whole")]
    pub time: i64,

    /// Merchant category
    pub merchant: String,

    /// Location label, e.g. "Abroad" or "High Risk Area"
    pub location: String,

    /// Transaction type (Credit, Debit, Transfer)
    #[serde(rename = "type")]
    pub transaction_type: String,

    /// Channel the transaction came through, e.g. "ATM"
    pub device: String,

    /// Days since the previous transaction on the account
    #[serde(deserialize_with = "crate::lenient::whole")]
    pub days_since: i64,

    /// Transactions already made today
    #[serde(deserialize_with = "crate::lenient::whole")]
    pub transactions_today: i64,
}

/// Risk score (1-99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create a risk score, clamping into [1, 99]
    pub fn new(score: i64) -> Self {
        Self(score.clamp(MIN_RISK_SCORE as i64, MAX_RISK_SCORE as i64) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }

    /// Check if the score marks the transaction as fraud (> 60)
    pub fn is_fraud(&self) -> bool {
        self.0 > 60
    }

    /// Check if the score needs a human look (31-60)
    pub fn needs_review(&self) -> bool {
        (31..=60).contains(&self.0)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verdict derived solely from the risk score thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Score of 30 or below
    #[serde(rename = "LEGITIMATE")]
    Legitimate,
    /// Score between 31 and 60
    #[serde(rename = "REVIEW NEEDED")]
    ReviewNeeded,
    /// Score above 60
    #[serde(rename = "FRAUD DETECTED")]
    FraudDetected,
}

impl Verdict {
    /// Wire representation of the verdict
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Legitimate => "LEGITIMATE",
            Verdict::ReviewNeeded => "REVIEW NEEDED",
            Verdict::FraudDetected => "FRAUD DETECTED",
        }
    }
}

impl From<RiskScore> for Verdict {
    fn from(score: RiskScore) -> Self {
        if score.is_fraud() {
            Verdict::FraudDetected
        } else if score.needs_review() {
            Verdict::ReviewNeeded
        } else {
            Verdict::Legitimate
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEGITIMATE" => Ok(Verdict::Legitimate),
            "REVIEW NEEDED" => Ok(Verdict::ReviewNeeded),
            "FRAUD DETECTED" => Ok(Verdict::FraudDetected),
            other => Err(format!("unknown verdict: {}", other)),
        }
    }
}

/// Whether the two simulated models reached the same opinion
///
/// Display only; it never feeds into the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelAgreement {
    /// Both models agree
    #[serde(rename = "Models Agree")]
    Agree,
    /// The models disagree
    #[serde(rename = "Models Diverge")]
    Diverge,
}

impl ModelAgreement {
    /// Wire representation of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelAgreement::Agree => "Models Agree",
            ModelAgreement::Diverge => "Models Diverge",
        }
    }
}

impl fmt::Display for ModelAgreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelAgreement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Models Agree" => Ok(ModelAgreement::Agree),
            "Models Diverge" => Ok(ModelAgreement::Diverge),
            other => Err(format!("unknown agreement label: {}", other)),
        }
    }
}

/// Explanation attached when a scoring rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskReason {
    /// Amount above 1000
    HighAmount,
    /// Hour between 0 and 6
    UnusualTime,
    /// Location is "Abroad"
    Abroad,
    /// Location is "High Risk Area"
    HighRiskArea,
    /// ATM use before 6am
    LateNightAtm,
    /// Large amount on an account idle for over a month
    DormancyReactivation,
    /// No rule fired
    NormalPattern,
}

impl RiskReason {
    /// Human readable text of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskReason::HighAmount => "High transaction amount",
            RiskReason::UnusualTime => "Unusual time (Late night/Early morning)",
            RiskReason::Abroad => "Location: Abroad",
            RiskReason::HighRiskArea => "Location: High Risk Area",
            RiskReason::LateNightAtm => "Late night ATM withdrawal",
            RiskReason::DormancyReactivation => "Large amount after dormancy",
            RiskReason::NormalPattern => "Normal transaction pattern",
        }
    }
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RiskReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of scoring one transaction
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Clamped risk score
    pub risk_score: RiskScore,

    /// Verdict for the score
    pub verdict: Verdict,

    /// True iff the score is above 60
    pub is_fraud: bool,

    /// Cosmetic confidence of the classical model (85-99)
    pub classical_confidence: u8,

    /// Cosmetic confidence of the quantum model (75-95)
    pub quantum_confidence: u8,

    /// Cosmetic agreement label
    pub agreement: ModelAgreement,

    /// Fired rules in evaluation order, never empty
    pub reasons: Vec<RiskReason>,
}
