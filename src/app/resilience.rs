use tracing::warn;

use crate::app::ports::PrimaryNormalizerPort;
use crate::config::ResilienceConfig;
use crate::error::NormalizerError;
use crate::observability::metrics;
use crate::types::RawOrder;

/// Calls the primary normalizer with a per-attempt timeout and bounded
/// exponential backoff.
///
/// Only retryable failures are retried. The returned error is the last one
/// seen; if it is retryable, every attempt was used up. An empty batch
/// returns `"[]"` without calling the normalizer.
pub async fn normalize_with_retry(
    normalizer: &dyn PrimaryNormalizerPort,
    raw_orders: &[RawOrder],
    policy: &ResilienceConfig,
) -> Result<String, NormalizerError> {
    if raw_orders.is_empty() {
        return Ok("[]".to_string());
    }

    let mut attempt: u32 = 0;
    loop {
        metrics::normalize::primary_attempt();

        let result = if policy.timeout_secs == 0 {
            normalizer.normalize(raw_orders).await
        } else {
            match tokio::time::timeout(policy.timeout(), normalizer.normalize(raw_orders)).await {
                Ok(result) => result,
                Err(_) => Err(NormalizerError::Timeout(policy.timeout_secs)),
            }
        };

        match result {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff_for(attempt);
                warn!(
                    "Primary normalizer attempt {} failed: {}; retrying in {:?}",
                    attempt, e, delay
                );
                metrics::normalize::primary_retry();
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
