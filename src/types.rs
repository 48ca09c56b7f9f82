use serde::{Deserialize, Serialize};

use crate::pipeline::processing::aggregate::AggregateModel;

/// One line of unstructured order text, format not guaranteed.
pub type RawOrder = String;

/// An order that passed schema validation. All four fields are present and typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOrder {
    pub order_id: String,
    pub buyer: String,
    pub state: String,
    pub total: f64,
}

/// The answer to one query: the filtered orders plus the per-state means
/// over everything that validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub orders: Vec<NormalizedOrder>,
    pub predicted_average_by_state: AggregateModel,
}

impl PipelineResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_serializes_with_camel_case_keys() {
        let order = NormalizedOrder {
            order_id: "1001".to_string(),
            buyer: "John Davis".to_string(),
            state: "OH".to_string(),
            total: 742.1,
        };
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"orderId": "1001", "buyer": "John Davis", "state": "OH", "total": 742.1})
        );
    }

    #[test]
    fn test_empty_result_shape() {
        assert_eq!(
            serde_json::to_value(PipelineResult::empty()).unwrap(),
            json!({"orders": [], "predicted_average_by_state": {}})
        );
    }
}
