//! HTTP routes of the Stock Price API.
//!
//! Handlers only parse query parameters and render results; all validation and
//! lookup logic lives in `stock::QueryService`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::debug;
use serde_json::{json, Value};
use std::sync::Arc;
use stock::query::DATE_EXAMPLE;
use stock::{CompanyId, DateSpan, QueryError, QueryService};
use tower_http::cors::CorsLayer;

// App State
#[derive(Clone)]
pub struct AppState {
    service: Arc<QueryService>,
}

impl AppState {
    pub fn new(service: Arc<QueryService>) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/companies", get(get_companies))
        .route("/date_range", get(get_date_range))
        .route("/get_stock", get(get_stock))
        .route("/get_stock_range", get(get_stock_range))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A `QueryError` rendered as a JSON error body with the matching status code.
#[derive(Debug)]
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            QueryError::MissingParameter(_)
            | QueryError::InvalidCompany(_)
            | QueryError::InvalidDateFormat(_)
            | QueryError::MissingDataColumn { .. } => StatusCode::BAD_REQUEST,
            QueryError::NoDataForDate(_) | QueryError::NoDataForRange { .. } => {
                StatusCode::NOT_FOUND
            }
            QueryError::DatasetUnavailable | QueryError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.0.to_string() });

        match &self.0 {
            QueryError::MissingParameter(op) => body["example"] = json!(op.example()),
            QueryError::InvalidCompany(_) => body["valid_companies"] = json!(CompanyId::ALL),
            QueryError::InvalidDateFormat(_) => body["example"] = json!(DATE_EXAMPLE),
            QueryError::NoDataForDate(_) => {
                body["suggestion"] = json!("Check /date_range for available dates")
            }
            QueryError::MissingDataColumn { column, .. } => body["missing_column"] = json!(column),
            QueryError::InternalError(details) => body["details"] = json!(details),
            QueryError::DatasetUnavailable | QueryError::NoDataForRange { .. } => {}
        }

        debug!("{} -> {}", self.0.kind(), status);
        (status, Json(body)).into_response()
    }
}

/// Raw query string pairs, in request order. Repeated keys are kept.
type QueryParams = Vec<(String, String)>;

/// First value given for `key`, ignoring any repeats.
fn first_param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn home() -> Json<Value> {
    Json(json!({
        "message": "Stock Price API",
        "endpoints": {
            "/get_stock": "GET - Retrieve stock data for a specific company and date",
            "/get_stock_range": "GET - Retrieve stock data for a company within a date range",
            "/companies": "GET - List all available companies",
            "/date_range": "GET - Get available date range for data"
        },
        "example": "/get_stock?company=AAPL&date=2023-07-10"
    }))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_companies(State(state): State<AppState>) -> Json<Value> {
    let companies = state.service.companies();
    Json(json!({
        "companies": companies,
        "total": companies.len()
    }))
}

async fn get_date_range(State(state): State<AppState>) -> Result<Json<DateSpan>, ApiError> {
    Ok(Json(state.service.date_span()?))
}

async fn get_stock(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let record = state.service.get_stock(
        first_param(&params, "company"),
        first_param(&params, "date"),
    )?;

    Ok(Json(json!({ "success": true, "data": record })))
}

async fn get_stock_range(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let records = state.service.get_stock_range(
        first_param(&params, "company"),
        first_param(&params, "start_date"),
        first_param(&params, "end_date"),
    )?;

    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}
