use crate::app::QueryUseCase;
use crate::observability::metrics;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hyper::Server;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<QueryUseCase>,
}

/// What a `/query` body asked for, once it is known to be well-formed.
#[derive(Debug, PartialEq)]
enum QueryRequest {
    Query(Option<String>),
    Invalid(&'static str),
}

fn parse_query_request(body: &[u8]) -> QueryRequest {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return QueryRequest::Invalid("Missing 'query' field");
    };
    match fields.get("query") {
        None => QueryRequest::Invalid("Missing 'query' field"),
        Some(Value::Null) => QueryRequest::Query(None),
        Some(Value::String(q)) => QueryRequest::Query(Some(q.clone())),
        Some(_) => QueryRequest::Invalid("Field 'query' must be a string"),
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Runs the pipeline for `{"query": "..."}`. Any pipeline error is a 500
/// carrying the error's message.
async fn query_orders(State(state): State<AppState>, body: Bytes) -> Response {
    let query = match parse_query_request(&body) {
        QueryRequest::Query(query) => query,
        QueryRequest::Invalid(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    match state.use_case.run(query.as_deref()).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("Agent failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Prometheus exposition, when the recorder is installed.
async fn metrics_handler() -> Response {
    match metrics::render() {
        Some(text) => (StatusCode::OK, text).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Create the HTTP server with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/query", post(query_orders))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    metrics::init();
    let app = create_server(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP server running on http://localhost:{}", port);
    info!("Health check: http://localhost:{}/health", port);

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
