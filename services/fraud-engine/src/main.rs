use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{anyhow, Context};
use dotenv::dotenv;
use fraud_engine::{
    config::{Config, CorsConfig, StoreBackend},
    database::Database,
    handlers, metrics,
    service::PredictionService,
    store::{InMemoryPredictionStore, PgPredictionStore, PredictionStore},
};
use risk_engine::RiskScorer;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraud_engine=info,risk_engine=info,actix_web=info".into()),
        )
        .json()
        .init();

    info!("Starting Fraud Engine...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    info!("Configuration loaded successfully");

    metrics::register_metrics(&metrics::REGISTRY).context("Failed to register metrics")?;

    // Acquire storage
    let (database, store): (Option<Database>, Arc<dyn PredictionStore>) = match config.store.backend {
        StoreBackend::Postgres => {
            let database = Database::connect(&config.database)
                .await
                .context("Database connection failed")?;
            database
                .health_check()
                .await
                .context("Database not accessible")?;
            info!("Database health check passed");

            if config.database.bootstrap_schema {
                database
                    .bootstrap_schema()
                    .await
                    .context("Failed to create predictions table")?;
            }

            let store: Arc<dyn PredictionStore> =
                Arc::new(PgPredictionStore::new(database.pool().clone()));
            (Some(database), store)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory prediction store; history is lost on restart");
            let store: Arc<dyn PredictionStore> = Arc::new(InMemoryPredictionStore::new());
            (None, store)
        }
    };

    let service = Arc::new(PredictionService::new(RiskScorer::new(), store));
    let service_data = web::Data::new(service);
    let history_config = web::Data::new(config.history.clone());
    let cors_config = config.cors.clone();

    let server_config = config.server.clone();
    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .app_data(history_config.clone())
            .wrap(cors(&cors_config))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await?;

    // Release storage
    if let Some(database) = database {
        database.close().await;
    }

    info!("Fraud Engine stopped");
    Ok(())
}

fn cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if config.allows_any() {
        return cors.allow_any_origin();
    }

    config
        .origins()
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
