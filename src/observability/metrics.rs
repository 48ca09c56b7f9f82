//! Metrics for the order query pipeline.
//!
//! Recording goes through the `metrics` facade and is a no-op until `init()`
//! installs the Prometheus recorder; the server renders it on `/metrics`.

use std::sync::OnceLock;
use tracing::{info, warn};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Every metric the pipeline emits, so names live in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Runs
    RunsStarted,
    RunsFailed,
    RunDuration,

    // Source
    RawOrdersFetched,
    EmptyFetches,

    // Normalize
    PrimaryAttempts,
    PrimaryRetries,
    FallbackUsed,

    // Validate
    OrdersValidated,
    ValidationFailures,

    // Filter
    OrdersReturned,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RunsStarted => "order_agent_runs_total",
            MetricName::RunsFailed => "order_agent_runs_failed_total",
            MetricName::RunDuration => "order_agent_run_duration_seconds",

            MetricName::RawOrdersFetched => "order_agent_raw_orders_fetched_total",
            MetricName::EmptyFetches => "order_agent_empty_fetches_total",

            MetricName::PrimaryAttempts => "order_agent_primary_attempts_total",
            MetricName::PrimaryRetries => "order_agent_primary_retries_total",
            MetricName::FallbackUsed => "order_agent_fallback_used_total",

            MetricName::OrdersValidated => "order_agent_orders_validated_total",
            MetricName::ValidationFailures => "order_agent_validation_failures_total",

            MetricName::OrdersReturned => "order_agent_orders_returned_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RunsStarted,
            RunsFailed,
            RunDuration,
            RawOrdersFetched,
            EmptyFetches,
            PrimaryAttempts,
            PrimaryRetries,
            FallbackUsed,
            OrdersValidated,
            ValidationFailures,
            OrdersReturned,
        ]
        .into_iter()
    }
}

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder once per process and returns its handle.
///
/// Later calls return the first handle. Returns `None` if another recorder
/// was already installed.
pub fn init() -> Option<PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            Some(HANDLE.get_or_init(|| handle).clone())
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Renders the current exposition text, if the recorder is installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

pub mod runs {
    use super::MetricName;

    pub fn started() {
        ::metrics::counter!(MetricName::RunsStarted.as_str()).increment(1);
    }

    pub fn failed(reason: &'static str) {
        ::metrics::counter!(MetricName::RunsFailed.as_str(), "reason" => reason).increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(secs);
    }
}

pub mod source {
    use super::MetricName;

    pub fn raw_orders_fetched(count: usize) {
        ::metrics::counter!(MetricName::RawOrdersFetched.as_str()).increment(count as u64);
        if count == 0 {
            ::metrics::counter!(MetricName::EmptyFetches.as_str()).increment(1);
        }
    }
}

pub mod normalize {
    use super::MetricName;

    pub fn primary_attempt() {
        ::metrics::counter!(MetricName::PrimaryAttempts.as_str()).increment(1);
    }

    pub fn primary_retry() {
        ::metrics::counter!(MetricName::PrimaryRetries.as_str()).increment(1);
    }

    /// `reason` is `malformed_output` or `retries_exhausted`.
    pub fn fallback_used(reason: &'static str) {
        ::metrics::counter!(MetricName::FallbackUsed.as_str(), "reason" => reason).increment(1);
    }
}

pub mod validate {
    use super::MetricName;

    pub fn orders_validated(count: usize) {
        ::metrics::counter!(MetricName::OrdersValidated.as_str()).increment(count as u64);
    }

    pub fn validation_failed() {
        ::metrics::counter!(MetricName::ValidationFailures.as_str()).increment(1);
    }
}

pub mod filter {
    use super::MetricName;

    pub fn orders_returned(count: usize) {
        ::metrics::counter!(MetricName::OrdersReturned.as_str()).increment(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: HashSet<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::all_metrics().count());
        assert!(names.iter().all(|n| n.starts_with("order_agent_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        runs::started();
        normalize::fallback_used("malformed_output");
        validate::orders_validated(3);
    }
}
