use crate::config::HistoryConfig;
use crate::errors::{json_error_handler, query_error_handler, FraudEngineError};
use crate::metrics;
use crate::models::*;
use crate::service::PredictionService;
use actix_web::{http::header, web, HttpResponse};
use risk_engine::TransactionInput;
use std::sync::Arc;
use tracing::warn;

pub const EXPORT_FILENAME: &str = "fraud_prediction_history.csv";

// ===== Root =====
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(RootResponse {
        message: "Quantum Fraud Detection API Online".to_string(),
    })
}

// ===== Health Check =====
pub async fn health_check(service: web::Data<Arc<PredictionService>>) -> HttpResponse {
    let store = service.store();

    let (mut response, status) = match store.health_check().await {
        Ok(()) => (HttpResponse::Ok(), "healthy"),
        Err(e) => {
            warn!(backend = store.backend(), error = %e, "Store health check failed");
            (HttpResponse::ServiceUnavailable(), "degraded")
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.backend().to_string(),
    })
}

// ===== Predict =====
pub async fn predict(
    req: web::Json<TransactionInput>,
    service: web::Data<Arc<PredictionService>>,
) -> Result<HttpResponse, FraudEngineError> {
    let record = service.predict(&req).await?;
    Ok(HttpResponse::Ok().json(record))
}

// ===== History =====
pub async fn history(
    query: web::Query<HistoryQuery>,
    service: web::Data<Arc<PredictionService>>,
    limits: web::Data<HistoryConfig>,
) -> Result<HttpResponse, FraudEngineError> {
    let limit = limits.resolve_limit(query.limit);
    let records = service.history(limit).await?;
    Ok(HttpResponse::Ok().json(records))
}

// ===== History Export =====
pub async fn export_history(
    service: web::Data<Arc<PredictionService>>,
    limits: web::Data<HistoryConfig>,
) -> Result<HttpResponse, FraudEngineError> {
    let records = service.history(limits.default_limit).await?;
    let body = history_csv(&records)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(body))
}

pub fn history_csv(records: &[PredictionRecord]) -> Result<String, FraudEngineError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let to_internal = |e: csv::Error| FraudEngineError::Internal(format!("CSV export failed: {}", e));

    writer
        .write_record(["Date", "Amount", "Merchant", "Location", "Status", "Risk Score"])
        .map_err(to_internal)?;

    for record in records {
        writer
            .write_record([
                record.timestamp.encode(),
                record.amount.normalize().to_string(),
                record.merchant.clone(),
                record.location.clone(),
                record.status.to_string(),
                record.risk_score.to_string(),
            ])
            .map_err(to_internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FraudEngineError::Internal(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| FraudEngineError::Internal(e.to_string()))
}

// ===== Metrics =====
pub async fn prometheus_metrics() -> HttpResponse {
    match metrics::render(&metrics::REGISTRY) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            warn!(error = %e, "Failed to render metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/", web::get().to(root))
                .route("/predict", web::post().to(predict))
                .route("/history", web::get().to(history))
                .route("/history/export", web::get().to(export_history))
                .route("/health", web::get().to(health_check)),
        )
        .route("/metrics", web::get().to(prometheus_metrics));
}
