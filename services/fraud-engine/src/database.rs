use crate::config::DatabaseConfig;
use crate::errors::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Executor;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Predictions table, created on startup when missing
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS predictions (
    id UUID PRIMARY KEY,
    timestamp TEXT NOT NULL,
    amount NUMERIC NOT NULL,
    merchant TEXT NOT NULL,
    location TEXT NOT NULL,
    status TEXT NOT NULL,
    risk_score INTEGER NOT NULL,
    is_fraud BOOLEAN NOT NULL,
    classical_conf INTEGER NOT NULL,
    quantum_conf INTEGER NOT NULL,
    agreement TEXT NOT NULL,
    reasons TEXT[] NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_predictions_timestamp ON predictions (timestamp DESC);
"#;

/// Process-wide database handle.
///
/// Opened once at startup and closed after the HTTP server stops.
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = PgConnectOptions::from_str(&config.url)?;
        if let Some(name) = &config.name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn bootstrap_schema(&self) -> Result<()> {
        // Plain &str runs as a simple query, which allows several statements
        (&self.pool).execute(SCHEMA_SQL).await?;
        info!("Predictions schema is in place");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
