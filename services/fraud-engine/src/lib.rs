pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use errors::{FraudEngineError, Result};
pub use service::PredictionService;
pub use store::{InMemoryPredictionStore, PgPredictionStore, PredictionStore};
