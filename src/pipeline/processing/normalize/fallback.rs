use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use super::CandidateOrder;

/// `Order <digits>: Buyer=<..>, Location=<..>, <ST>, Total=$<decimal>` anywhere in the line.
static ORDER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Order\s+(?P<orderId>\d+):\s+Buyer=(?P<buyer>[^,]+),\s+Location=[^,]+,\s+(?P<state>[A-Z]{2}),\s+Total=\$(?P<total>[\d.]+)",
    )
    .expect("order line pattern compiles")
});

/// Deterministic, regex-based normalizer for the one raw-order grammar we know.
///
/// Has no external dependency and cannot fail: lines that don't match (or whose
/// total is not a number) are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNormalizer;

impl FallbackNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw_orders: &[String]) -> Vec<CandidateOrder> {
        let candidates: Vec<CandidateOrder> = raw_orders
            .iter()
            .filter_map(|line| self.parse_line(line))
            .collect();

        debug!(
            "Fallback normalizer matched {} of {} lines",
            candidates.len(),
            raw_orders.len()
        );
        candidates
    }

    pub fn parse_line(&self, line: &str) -> Option<CandidateOrder> {
        let Some(caps) = ORDER_LINE.captures(line) else {
            debug!(line, "Dropping raw order that does not match the order grammar");
            return None;
        };

        let total: f64 = match caps["total"].parse() {
            Ok(total) => total,
            Err(_) => {
                debug!(line, "Dropping raw order with malformed total");
                return None;
            }
        };

        Some(json!({
            "orderId": &caps["orderId"],
            "buyer": &caps["buyer"],
            "state": &caps["state"],
            "total": total,
        }))
    }
}
