use crate::errors::Result;
use crate::metrics;
use crate::models::PredictionRecord;
use crate::store::PredictionStore;
use risk_engine::{RiskScorer, TransactionInput};
use std::sync::Arc;
use tracing::{error, info};

pub struct PredictionService {
    scorer: RiskScorer,
    store: Arc<dyn PredictionStore>,
}

impl PredictionService {
    pub fn new(scorer: RiskScorer, store: Arc<dyn PredictionStore>) -> Self {
        Self { scorer, store }
    }

    pub fn store(&self) -> &Arc<dyn PredictionStore> {
        &self.store
    }

    /// Score a transaction and persist the result.
    ///
    /// A storage failure discards the prediction; nothing is retried.
    pub async fn predict(&self, input: &TransactionInput) -> Result<PredictionRecord> {
        let assessment = self.scorer.assess(input);
        let record = PredictionRecord::new(input, assessment);

        if let Err(e) = self.store.append(&record).await {
            error!(id = %record.id, error = %e, "Failed to persist prediction");
            return Err(e);
        }

        metrics::PREDICTIONS_TOTAL
            .with_label_values(&[record.status.as_str()])
            .inc();
        metrics::RISK_SCORE.observe(record.risk_score.score() as f64);

        info!(
            id = %record.id,
            risk_score = record.risk_score.score(),
            status = %record.status,
            "Prediction recorded"
        );

        Ok(record)
    }

    pub async fn history(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        self.store.recent_history(limit).await
    }
}
