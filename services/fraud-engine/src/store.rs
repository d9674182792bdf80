//! Append-only persistence for scored predictions.

use crate::errors::{FraudEngineError, Result};
use crate::metrics;
use crate::models::{PredictionRecord, RecordedAt};
use async_trait::async_trait;
use risk_engine::RiskScore;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Persist one record. The record is committed once this returns Ok.
    async fn append(&self, record: &PredictionRecord) -> Result<()>;

    /// Up to `limit` records, most recent first.
    async fn recent_history(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    async fn health_check(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}

// ===== PostgreSQL =====

pub struct PgPredictionStore {
    pool: PgPool,
}

impl PgPredictionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, record: &PredictionRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO predictions
             (id, timestamp, amount, merchant, location, status, risk_score, is_fraud,
              classical_conf, quantum_conf, agreement, reasons)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(record.id)
        .bind(record.timestamp.encode())
        .bind(record.amount)
        .bind(&record.merchant)
        .bind(&record.location)
        .bind(record.status.as_str())
        .bind(record.risk_score.score() as i32)
        .bind(record.is_fraud)
        .bind(record.classical_conf as i32)
        .bind(record.quantum_conf as i32)
        .bind(record.agreement.as_str())
        .bind(&record.reasons)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn select_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query(
            "SELECT id, timestamp, amount, merchant, location, status, risk_score, is_fraud,
                    classical_conf, quantum_conf, agreement, reasons
             FROM predictions
             ORDER BY timestamp DESC
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &PgRow) -> Result<PredictionRecord> {
    let timestamp: String = row.try_get("timestamp")?;
    let status: String = row.try_get("status")?;
    let agreement: String = row.try_get("agreement")?;

    Ok(PredictionRecord {
        id: row.try_get::<Uuid, _>("id")?,
        timestamp: RecordedAt::decode(&timestamp),
        amount: row.try_get::<Decimal, _>("amount")?,
        merchant: row.try_get("merchant")?,
        location: row.try_get("location")?,
        status: status.parse().map_err(FraudEngineError::Internal)?,
        risk_score: RiskScore::new(row.try_get::<i32, _>("risk_score")? as i64),
        is_fraud: row.try_get("is_fraud")?,
        classical_conf: row.try_get::<i32, _>("classical_conf")?.clamp(0, u8::MAX as i32) as u8,
        quantum_conf: row.try_get::<i32, _>("quantum_conf")?.clamp(0, u8::MAX as i32) as u8,
        agreement: agreement.parse().map_err(FraudEngineError::Internal)?,
        reasons: row.try_get("reasons")?,
    })
}

#[async_trait]
impl PredictionStore for PgPredictionStore {
    async fn append(&self, record: &PredictionRecord) -> Result<()> {
        let started = Instant::now();
        let result = self.insert(record).await;
        metrics::observe_store("append", result.is_ok(), started.elapsed().as_secs_f64());

        if result.is_ok() {
            debug!(id = %record.id, "Prediction persisted");
        }
        result
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let started = Instant::now();
        let result = self.select_recent(limit).await;
        metrics::observe_store("recent_history", result.is_ok(), started.elapsed().as_secs_f64());
        result
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// ===== In-memory =====

/// Process-local store, ordered the same way as the PostgreSQL backend.
#[derive(Default)]
pub struct InMemoryPredictionStore {
    records: RwLock<Vec<PredictionRecord>>,
}

impl InMemoryPredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select_recent(&self, limit: usize) -> Vec<PredictionRecord> {
        let records = self.records.read().await;

        // Newest append first so ties on the timestamp text keep that order
        let mut keyed: Vec<(String, &PredictionRecord)> = records
            .iter()
            .rev()
            .map(|r| (r.timestamp.encode(), r))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));

        keyed
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait]
impl PredictionStore for InMemoryPredictionStore {
    async fn append(&self, record: &PredictionRecord) -> Result<()> {
        let started = Instant::now();
        self.records.write().await.push(record.clone());
        metrics::observe_store("append", true, started.elapsed().as_secs_f64());

        debug!(id = %record.id, "Prediction kept in memory");
        Ok(())
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let started = Instant::now();
        let records = self.select_recent(limit).await;
        metrics::observe_store("recent_history", true, started.elapsed().as_secs_f64());
        Ok(records)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
