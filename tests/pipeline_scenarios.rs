use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use order_agent::app::ports::{PrimaryNormalizerPort, RawOrderSourcePort};
use order_agent::app::QueryUseCase;
use order_agent::config::Config;
use order_agent::error::{AgentError, NormalizerError, ValidationError};
use order_agent::pipeline::{aggregate, validate_batch, FallbackNormalizer, QueryFilter};

const CANONICAL_LINES: [&str; 2] = [
    "Order 1001: Buyer=John Davis, Location=Columbus, OH, Total=$742.10, Items: laptop",
    "Order 1004: Buyer=Rachel Kim, Location=Seattle, WA, Total=$89.50, Items: coffee maker",
];

struct FixedSource(Vec<String>);

#[async_trait]
impl RawOrderSourcePort for FixedSource {
    async fn fetch(&self, _limit: usize) -> Vec<String> {
        self.0.clone()
    }
}

/// Always answers with the same text and counts how often it was asked.
struct CannedNormalizer {
    reply: String,
    calls: AtomicUsize,
}

#[async_trait]
impl PrimaryNormalizerPort for CannedNormalizer {
    async fn normalize(&self, _raw_orders: &[String]) -> Result<String, NormalizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

fn agent(lines: &[&str], reply: &str) -> (QueryUseCase, Arc<CannedNormalizer>) {
    let primary = Arc::new(CannedNormalizer {
        reply: reply.to_string(),
        calls: AtomicUsize::new(0),
    });
    let source = Arc::new(FixedSource(lines.iter().map(|s| s.to_string()).collect()));
    (QueryUseCase::new(source, primary.clone(), &Config::default()), primary)
}

#[tokio::test]
async fn fallback_recovers_canonical_lines_when_primary_output_is_invalid() {
    let (agent, _) = agent(&CANONICAL_LINES, "{ this is not json");

    let result = agent.run(None).await.unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value["orders"],
        json!([
            {"orderId": "1001", "buyer": "John Davis", "state": "OH", "total": 742.10},
            {"orderId": "1004", "buyer": "Rachel Kim", "state": "WA", "total": 89.50}
        ])
    );
}

#[tokio::test]
async fn state_query_filters_orders_but_not_the_aggregate() {
    let (agent, _) = agent(&CANONICAL_LINES, "not json");

    let result = agent.run(Some("orders in ohio")).await.unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["orders"].as_array().unwrap().len(), 1);
    assert_eq!(value["orders"][0]["state"], "OH");
    assert_eq!(
        value["predicted_average_by_state"],
        json!({"OH": 742.1, "WA": 89.5})
    );
}

#[tokio::test]
async fn over_threshold_query_keeps_only_larger_totals() {
    let (agent, _) = agent(&CANONICAL_LINES, "not json");

    let result = agent.run(Some("orders over 100")).await.unwrap();
    assert_eq!(result.orders.len(), 1);
    assert_eq!(result.orders[0].total, 742.10);
}

#[tokio::test]
async fn spelled_out_threshold_is_ignored() {
    let (agent, _) = agent(&CANONICAL_LINES, "not json");

    let result = agent.run(Some("orders over five hundred")).await.unwrap();
    assert_eq!(result.orders.len(), 2);
}

#[tokio::test]
async fn no_raw_orders_yields_empty_result_without_calling_primary() {
    let (agent, primary) = agent(&[], "[]");

    let result = agent.run(Some("orders in texas")).await.unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"orders": [], "predicted_average_by_state": {}})
    );
    assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unparsable_total_from_primary_aborts_the_run() {
    let reply = r#"[{"orderId": "1001", "buyer": "John Davis", "state": "OH", "total": "not-a-number"}]"#;
    let (agent, _) = agent(&CANONICAL_LINES, reply);

    let err = agent.run(None).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::Validation(ValidationError::InvalidField { field: "total", .. })
    ));
}

#[tokio::test]
async fn primary_output_that_is_an_object_is_a_schema_failure() {
    let (agent, _) = agent(&CANONICAL_LINES, r#"{"orders": []}"#);

    let err = agent.run(None).await.unwrap_err();
    assert!(matches!(err, AgentError::Validation(ValidationError::NotAnArray)));
}

#[test]
fn stages_compose_without_the_use_case() {
    let lines: Vec<String> = CANONICAL_LINES.iter().map(|s| s.to_string()).collect();
    let candidates = FallbackNormalizer::new().normalize(&lines);
    let validated = validate_batch(&candidates).unwrap();

    let model = aggregate(&validated);
    let filtered = QueryFilter::from_query("Washington orders").apply(validated.clone());

    assert_eq!(model.len(), 2);
    assert_eq!(filtered.len(), 1);
    assert!(filtered.iter().all(|o| o.state == "WA"));
    assert_eq!(model.predict_total("oh"), Some(742.1));
}
