use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::app::ports::{PrimaryNormalizerPort, RawOrderSourcePort};
use crate::app::resilience::normalize_with_retry;
use crate::config::{Config, ResilienceConfig};
use crate::error::{AgentError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::aggregate::aggregate;
use crate::pipeline::processing::filter::QueryFilter;
use crate::pipeline::processing::normalize::{
    candidates_from_json, CandidateOrder, FallbackNormalizer, PrimaryOutcome,
};
use crate::pipeline::processing::validate::validate_batch;
use crate::types::{NormalizedOrder, PipelineResult, RawOrder};

/// Answers one natural-language query over freshly fetched orders.
///
/// Fetch → primary normalizer (fallback on malformed output, or on
/// exhausted retries when enabled) → all-or-nothing validation → aggregate
/// over everything validated, filter by query intent.
pub struct QueryUseCase {
    source: Arc<dyn RawOrderSourcePort>,
    primary: Arc<dyn PrimaryNormalizerPort>,
    fallback: FallbackNormalizer,
    fetch_limit: usize,
    resilience: ResilienceConfig,
}

impl QueryUseCase {
    pub fn new(
        source: Arc<dyn RawOrderSourcePort>,
        primary: Arc<dyn PrimaryNormalizerPort>,
        config: &Config,
    ) -> Self {
        Self {
            source,
            primary,
            fallback: FallbackNormalizer::new(),
            fetch_limit: config.order_api.fetch_limit,
            resilience: config.resilience.clone(),
        }
    }

    /// Fetches raw orders and runs the pipeline over them.
    pub async fn run(&self, query: Option<&str>) -> Result<PipelineResult> {
        info!("Agent started with query: {:?}", query);
        metrics::runs::started();
        let started = Instant::now();

        let raw_orders = self.source.fetch(self.fetch_limit).await;
        metrics::source::raw_orders_fetched(raw_orders.len());

        let result = self.process(&raw_orders, query).await;
        metrics::runs::duration(started.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics::runs::failed(failure_reason(e));
        }
        result
    }

    /// Runs the pipeline over an already fetched batch.
    pub async fn process(&self, raw_orders: &[RawOrder], query: Option<&str>) -> Result<PipelineResult> {
        if raw_orders.is_empty() {
            warn!("No orders returned from source");
            return Ok(PipelineResult::empty());
        }
        debug!("Raw orders: {:?}", raw_orders);

        let candidates = self.normalize(raw_orders).await?;

        let validated = validate_batch(&candidates).map_err(|e| {
            metrics::validate::validation_failed();
            e
        })?;
        metrics::validate::orders_validated(validated.len());

        let predicted_average_by_state = aggregate(&validated);
        let total = validated.len();
        let orders = self.filter(validated, query);

        info!("Agent completed | total={} | returned={}", total, orders.len());
        metrics::filter::orders_returned(orders.len());

        Ok(PipelineResult {
            orders,
            predicted_average_by_state,
        })
    }

    /// Looks up one raw order line by id.
    pub async fn find_raw_order(&self, order_id: &str) -> Option<RawOrder> {
        self.source.fetch_by_id(order_id).await
    }

    async fn normalize(&self, raw_orders: &[RawOrder]) -> Result<Vec<CandidateOrder>> {
        let text = match normalize_with_retry(self.primary.as_ref(), raw_orders, &self.resilience).await {
            Ok(text) => text,
            Err(e) if e.is_retryable() && self.resilience.fallback_on_exhausted => {
                warn!("Primary normalizer unavailable after retries, falling back: {}", e);
                metrics::normalize::fallback_used("retries_exhausted");
                return Ok(self.fallback.normalize(raw_orders));
            }
            Err(e) => return Err(e.into()),
        };

        match PrimaryOutcome::classify(text) {
            PrimaryOutcome::Decoded(value) => Ok(candidates_from_json(value)?),
            PrimaryOutcome::MalformedOutput(_) => {
                metrics::normalize::fallback_used("malformed_output");
                Ok(self.fallback.normalize(raw_orders))
            }
        }
    }

    fn filter(&self, orders: Vec<NormalizedOrder>, query: Option<&str>) -> Vec<NormalizedOrder> {
        let filter = QueryFilter::from_optional_query(query);
        debug!("Derived query filter: {:?}", filter);
        filter.apply(orders)
    }
}

fn failure_reason(err: &AgentError) -> &'static str {
    match err {
        AgentError::Validation(_) => "validation",
        AgentError::PrimaryNormalizer(_) => "primary_normalizer",
        _ => "other",
    }
}
