use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Business metrics - fraud scoring
    pub static ref PREDICTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("fraud_predictions_total", "Total predictions by verdict"),
        &["status"]
    ).expect("metric can be created");

    pub static ref RISK_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("fraud_risk_score", "Distribution of assigned risk scores")
            .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 99.0])
    ).expect("metric can be created");

    // Store metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("store_operations_total", "Total prediction store operations"),
        &["operation", "result"]
    ).expect("metric can be created");

    pub static ref STORE_OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("store_operation_duration_seconds", "Prediction store operation duration in seconds")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["operation"]
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(PREDICTIONS_TOTAL.clone()))?;
    registry.register(Box::new(RISK_SCORE.clone()))?;
    registry.register(Box::new(STORE_OPERATIONS_TOTAL.clone()))?;
    registry.register(Box::new(STORE_OPERATION_DURATION.clone()))?;
    Ok(())
}

/// Record the outcome of a store call
pub fn observe_store(operation: &str, ok: bool, seconds: f64) {
    let result = if ok { "ok" } else { "error" };
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
    STORE_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(seconds);
}

/// Generate metrics output in Prometheus text format
pub fn render(registry: &Registry) -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
