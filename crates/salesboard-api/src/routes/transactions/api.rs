//! Transactions API endpoints - JSON API
//!
//! Endpoints:
//! - api_init: Reseed the store from the configured source
//! - api_transactions: Month-scoped list with search and pagination
//! - api_statistics: Sale totals for a month
//! - api_bar_chart: Price histogram for a month
//! - api_pie_chart: Category counts for a month
//! - api_combined: Statistics and both charts in one response

use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::Json;
use salesboard_core::{
    BucketCount, CategoryCount, CombinedReport, ErrorContext, Pagination, SaleMonth, SeedSummary,
    Statistics, TransactionsPage,
};
use std::collections::HashMap;

type Params = Query<HashMap<String, String>>;

/// Resolve the required `month` parameter, with an error context for the operation
fn month_param(params: &HashMap<String, String>, operation: &str) -> Result<(SaleMonth, ErrorContext), ApiError> {
    let raw = params.get("month").map(String::as_str);
    let context = ErrorContext::new(operation).with_month(raw);
    let month = SaleMonth::resolve(raw).map_err(|e| ApiError::from_core(e, &context))?;
    Ok((month, context))
}

/// Reseed the database (JSON API)
pub async fn api_init(State(state): State<AppState>) -> Result<Json<SeedSummary>, ApiError> {
    let context = ErrorContext::new("initialize database");
    let inserted = state
        .engine
        .reseed()
        .await
        .map_err(|e| ApiError::from_core(e, &context))?;

    Ok(Json(SeedSummary {
        message: "Database initialized with seed data.".to_string(),
        inserted,
    }))
}

/// Get transactions with search and pagination (JSON API)
///
/// `perPage` is clamped to `pagination.max_per_page` (100 by default) and a
/// missing or non-positive value means `pagination.per_page`. The response's
/// `perPage` is the size actually applied.
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<TransactionsPage>, ApiError> {
    let (month, context) = month_param(&params, "list transactions")?;
    let search = params.get("search").map(String::as_str).unwrap_or("");
    let pagination = Pagination::from_params(
        params.get("page").map(String::as_str),
        params.get("perPage").map(String::as_str),
        state.engine.pagination_config(),
    );

    state
        .engine
        .list(month, search, pagination)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &context))
}

/// Get monthly statistics (JSON API)
pub async fn api_statistics(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Statistics>, ApiError> {
    let (month, context) = month_param(&params, "get statistics")?;
    state
        .engine
        .statistics(month)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &context))
}

/// Get price histogram (JSON API)
pub async fn api_bar_chart(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Vec<BucketCount>>, ApiError> {
    let (month, context) = month_param(&params, "get bar chart data")?;
    state
        .engine
        .bar_chart(month)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &context))
}

/// Get category breakdown (JSON API)
pub async fn api_pie_chart(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let (month, context) = month_param(&params, "get pie chart data")?;
    state
        .engine
        .pie_chart(month)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &context))
}

/// Get statistics, bar chart and pie chart together (JSON API)
pub async fn api_combined(
    State(state): State<AppState>,
    Query(params): Params,
) -> Result<Json<CombinedReport>, ApiError> {
    let (month, context) = month_param(&params, "get combined data")?;
    state
        .engine
        .combined(month)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &context))
}
