use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use dynprice_core::{BatchError, CustomerFeatures, PricingRequest};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BatchPricingRequest {
    pub customers: Vec<serde_json::Value>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/calculate_price", post(calculate_price))
        .route("/api/calculate_batch_prices", post(calculate_batch_prices))
        .route("/api/test_model", get(test_model))
}

/// POST /api/calculate_price
/// Price a single customer. Bodies carry the seven feature fields plus an
/// optional `product_cost`; a missing or mistyped field comes back as a 400
/// naming the field.
pub async fn calculate_price(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let request = PricingRequest::from_json(&body)?;
    let result = state.engine.price_request(&request)?;
    Ok(Json(json!({ "status": "success", "data": result })))
}

/// POST /api/calculate_batch_prices
/// Price an ordered batch. Fail-fast: the first bad element aborts the batch
/// and the error names its position.
pub async fn calculate_batch_prices(
    State(state): State<AppState>,
    Json(body): Json<BatchPricingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut requests = Vec::with_capacity(body.customers.len());
    for (position, raw) in body.customers.iter().enumerate() {
        let request = PricingRequest::from_json(raw).map_err(|source| BatchError {
            position,
            source: source.into(),
        })?;
        requests.push(request);
    }

    let results = state.engine.price_batch(&requests)?;
    Ok(Json(json!({ "status": "success", "data": results })))
}

/// GET /api/test_model
/// Run the canonical smoke vector through the engine and re-check the floor
/// invariant. Any failure here means the model is misbehaving: 500.
pub async fn test_model(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let request = smoke_request();
    let result = state
        .engine
        .price_request(&request)
        .map_err(|e| AppError::Scoring(format!("model test failed: {e}")))?;

    if result.dynamic_price < result.min_price {
        return Err(AppError::Scoring(
            "model test failed: price below minimum threshold".to_string(),
        ));
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Model working correctly",
        "test_result": result,
        "test_input": request,
    })))
}

fn smoke_request() -> PricingRequest {
    PricingRequest::new(
        CustomerFeatures {
            recency: 30.0,
            frequency: 5.0,
            monetary_value: 500.0,
            tenure: 365.0,
            avg_days_between_purchases: 30.0,
            age: 35.0,
            unique_products_count: 3.0,
        },
        50.0,
    )
}
