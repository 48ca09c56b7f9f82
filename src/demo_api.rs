//! A stand-in customer order API serving the canonical sample lines as messy text.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::json;

use crate::constants::SAMPLE_RAW_ORDERS;

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    limit: Option<String>,
}

/// A random sample of at most `limit` lines; all of them when `limit` is absent or unparsable.
pub fn sample_orders(limit: Option<usize>) -> Vec<String> {
    let count = limit
        .unwrap_or(SAMPLE_RAW_ORDERS.len())
        .min(SAMPLE_RAW_ORDERS.len());
    let mut rng = rand::thread_rng();
    SAMPLE_RAW_ORDERS
        .choose_multiple(&mut rng, count)
        .map(|line| line.to_string())
        .collect()
}

async fn get_orders(Query(params): Query<LimitParams>) -> impl IntoResponse {
    let limit = params.limit.and_then(|l| l.trim().parse::<usize>().ok());
    Json(json!({
        "status": "ok",
        "raw_orders": sample_orders(limit),
    }))
}

async fn get_order_by_id(Path(order_id): Path<String>) -> Response {
    let prefix = format!("Order {}:", order_id);
    match SAMPLE_RAW_ORDERS.iter().find(|line| line.starts_with(&prefix)) {
        Some(line) => Json(json!({ "status": "ok", "raw_order": line })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "status": "not_found" }))).into_response(),
    }
}

pub fn demo_router() -> Router {
    Router::new()
        .route("/api/orders", get(get_orders))
        .route("/api/order/:order_id", get(get_order_by_id))
}
