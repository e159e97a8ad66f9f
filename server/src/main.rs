mod config;
mod db;
mod errors;
mod metrics;
mod model;
mod rest;

use axum::{routing::get, Router};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Starting farmwatch server");
    info!("HTTP server: {}", config.http_addr);
    match &config.db.cloud_sql_connection_name {
        Some(instance) => info!("Database: Cloud SQL instance {}", instance),
        None => info!(
            "Database: {}:{}/{}",
            config.db.host, config.db.port, config.db.database
        ),
    }

    // Initialize metrics
    metrics::init_metrics();

    // Connect to database
    let pool = match db::make_pool(&config.db).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Build HTTP app with REST API, dashboard pages and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(pool));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
