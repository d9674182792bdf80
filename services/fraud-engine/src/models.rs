use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use risk_engine::{ModelAgreement, RiskAssessment, RiskScore, TransactionInput, Verdict};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ===== Creation Timestamp =====

/// Creation timestamp as read back from storage.
///
/// Stored text that does not parse is kept verbatim instead of failing the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedAt {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl RecordedAt {
    pub fn now() -> Self {
        RecordedAt::Parsed(Utc::now())
    }

    /// Decode stored text: RFC 3339 first, then naive ISO 8601 read as UTC.
    pub fn decode(raw: &str) -> Self {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return RecordedAt::Parsed(ts.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return RecordedAt::Parsed(naive.and_utc());
        }

        RecordedAt::Raw(raw.to_string())
    }

    /// Text form written to storage; sorts lexicographically in time order.
    pub fn encode(&self) -> String {
        match self {
            RecordedAt::Parsed(ts) => ts.to_rfc3339_opts(SecondsFormat::Micros, true),
            RecordedAt::Raw(raw) => raw.clone(),
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordedAt::Parsed(ts) => Some(*ts),
            RecordedAt::Raw(_) => None,
        }
    }
}

// ===== Prediction Record =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    pub timestamp: RecordedAt,

    // Input echo
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub merchant: String,
    pub location: String,

    // Prediction results
    pub status: Verdict,
    pub risk_score: RiskScore,
    pub is_fraud: bool,
    pub classical_conf: u8,
    pub quantum_conf: u8,
    pub agreement: ModelAgreement,
    pub reasons: Vec<String>,
}

impl PredictionRecord {
    pub fn new(input: &TransactionInput, assessment: RiskAssessment) -> Self {
        PredictionRecord {
            id: Uuid::new_v4(),
            timestamp: RecordedAt::now(),
            amount: input.amount,
            merchant: input.merchant.clone(),
            location: input.location.clone(),
            status: assessment.verdict,
            risk_score: assessment.risk_score,
            is_fraud: assessment.is_fraud,
            classical_conf: assessment.classical_confidence,
            quantum_conf: assessment.quantum_confidence,
            agreement: assessment.agreement,
            reasons: assessment
                .reasons
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
    }
}

// ===== History Query =====
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

// ===== Root =====
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

// ===== Health Check =====
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}
