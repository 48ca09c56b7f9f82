use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::NormalizedOrder;

/// Mean order total per state, rounded to cents.
///
/// Only states that appear in the validated set have an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateModel(BTreeMap<String, f64>);

impl AggregateModel {
    pub fn get(&self, state: &str) -> Option<f64> {
        self.0.get(state).copied()
    }

    /// Expected total for an order from `state`, matched case-insensitively.
    pub fn predict_total(&self, state: &str) -> Option<f64> {
        self.get(&state.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Groups by state and averages `total`. Runs over the validated set, before
/// any query filter, so it describes everything that was fetched.
pub fn aggregate(orders: &[NormalizedOrder]) -> AggregateModel {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for order in orders {
        let entry = sums.entry(order.state.as_str()).or_insert((0.0, 0));
        entry.0 += order.total;
        entry.1 += 1;
    }

    AggregateModel(
        sums.into_iter()
            .map(|(state, (sum, count))| (state.to_string(), round_cents(sum / count as f64)))
            .collect(),
    )
}

/// Exact half cents round to the even neighbour.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(state: &str, total: f64) -> NormalizedOrder {
        NormalizedOrder {
            order_id: "1".to_string(),
            buyer: "Buyer".to_string(),
            state: state.to_string(),
            total,
        }
    }

    #[test]
    fn test_mean_per_state() {
        let orders = vec![
            order("OH", 742.10),
            order("TX", 156.55),
            order("OH", 1299.99),
            order("WA", 89.50),
            order("OH", 512.00),
        ];

        let model = aggregate(&orders);
        assert_eq!(model.len(), 3);
        // (742.10 + 1299.99 + 512.00) / 3 = 851.3633...
        assert_eq!(model.get("OH"), Some(851.36));
        assert_eq!(model.get("TX"), Some(156.55));
        assert_eq!(model.get("WA"), Some(89.5));
        assert_eq!(model.get("CA"), None);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let model = aggregate(&[order("TX", 10.0), order("TX", 10.0), order("TX", 10.01)]);
        assert_eq!(model.get("TX"), Some(10.0));

        let model = aggregate(&[order("TX", 1.0), order("TX", 2.0), order("TX", 2.0)]);
        assert_eq!(model.get("TX"), Some(1.67));
    }

    #[test]
    fn test_half_cent_means_round_to_even() {
        let model = aggregate(&[order("OH", 0.25), order("OH", 0.0)]);
        assert_eq!(model.get("OH"), Some(0.12));

        let model = aggregate(&[order("TX", 2.0), order("TX", 0.25)]);
        assert_eq!(model.get("TX"), Some(1.12));

        let model = aggregate(&[order("WA", 0.375), order("WA", 0.0)]);
        assert_eq!(model.get("WA"), Some(0.19));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_predict_total_ignores_case() {
        let model = aggregate(&[order("WA", 89.5)]);
        assert_eq!(model.predict_total("wa"), Some(89.5));
        assert_eq!(model.predict_total("ohio"), None);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let model = aggregate(&[order("WA", 89.5), order("OH", 742.1)]);
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            serde_json::json!({"OH": 742.1, "WA": 89.5})
        );
    }
}
