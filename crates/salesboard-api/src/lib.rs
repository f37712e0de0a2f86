//! HTTP API server and dashboard page
//!
//! Routes are organized into modules:
//! - routes::transactions: Reseed, month-scoped list, statistics and charts

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use salesboard_config::Config;
use salesboard_core::TransactionEngine;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: TransactionEngine,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::transactions::{
        api_bar_chart, api_combined, api_init, api_pie_chart, api_statistics, api_transactions,
        page_dashboard,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/transactions/init", post(api_init))
        .route("/api/transactions", get(api_transactions))
        .route("/api/transactions/statistics", get(api_statistics))
        .route("/api/transactions/bar-chart", get(api_bar_chart))
        .route("/api/transactions/pie-chart", get(api_pie_chart))
        .route("/api/transactions/combined", get(api_combined))
        // Page routes
        .route("/", get(page_dashboard))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Salesboard</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Bind the configured address and serve until Ctrl-C
pub async fn start_server(config: &Config, engine: TransactionEngine) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let router = create_router(AppState { engine });

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Salesboard server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - POST /api/transactions/init (Reseed)");
    log::info!("  - /api/transactions[/statistics|/bar-chart|/pie-chart|/combined]?month=");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
