use serde_json::{Map, Value};
use tracing::error;

use crate::error::ValidationError;
use crate::pipeline::processing::normalize::CandidateOrder;
use crate::types::NormalizedOrder;

/// Coerces every candidate into a `NormalizedOrder`, or fails the whole batch.
///
/// Unlike the fallback normalizer, which quietly skips noise, a record that
/// already claims to be structured is held to its contract: the first bad
/// candidate aborts validation and no partial list is returned.
pub fn validate_batch(candidates: &[CandidateOrder]) -> Result<Vec<NormalizedOrder>, ValidationError> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            coerce_order(index, candidate).map_err(|e| {
                error!("Invalid order schema: {} | error={}", candidate, e);
                e
            })
        })
        .collect()
}

fn coerce_order(index: usize, candidate: &CandidateOrder) -> Result<NormalizedOrder, ValidationError> {
    let fields = candidate
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    Ok(NormalizedOrder {
        order_id: coerce_string(index, fields, "orderId")?,
        buyer: coerce_string(index, fields, "buyer")?,
        state: coerce_string(index, fields, "state")?.to_uppercase(),
        total: coerce_total(index, fields)?,
    })
}

fn coerce_string(
    index: usize,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match fields.get(field) {
        None => Err(ValidationError::MissingField { index, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        // Anything else is kept as its JSON text
        Some(other) => Ok(other.to_string()),
    }
}

fn coerce_total(index: usize, fields: &Map<String, Value>) -> Result<f64, ValidationError> {
    const FIELD: &str = "total";

    let total = match fields.get(FIELD) {
        None => return Err(ValidationError::MissingField { index, field: FIELD }),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(index, FIELD, format!("{} is not representable as f64", n)))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(index, FIELD, format!("could not parse '{}' as a number", s)))?,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(other) => {
            return Err(invalid(index, FIELD, format!("expected a number, got {}", kind(other))))
        }
    };

    if !total.is_finite() {
        return Err(invalid(index, FIELD, format!("{} is not a finite number", total)));
    }
    Ok(total)
}

fn invalid(index: usize, field: &'static str, reason: String) -> ValidationError {
    ValidationError::InvalidField { index, field, reason }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerces_loosely_typed_candidates() {
        let candidates = vec![
            json!({"orderId": 1001, "buyer": "John Davis", "state": "oh", "total": "742.10"}),
            json!({"orderId": "1004", "buyer": "Rachel Kim", "state": "WA", "total": 89.5, "items": ["coffee maker"]}),
        ];

        let orders = validate_batch(&candidates).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "1001");
        assert_eq!(orders[0].state, "OH");
        assert_eq!(orders[0].total, 742.10);
        assert_eq!(orders[1].buyer, "Rachel Kim");
        assert_eq!(orders[1].total, 89.5);
    }

    #[test]
    fn test_missing_total_fails_whole_batch() {
        let candidates = vec![
            json!({"orderId": "1", "buyer": "A", "state": "OH", "total": 10.0}),
            json!({"orderId": "2", "buyer": "B", "state": "TX"}),
            json!({"orderId": "3", "buyer": "C", "state": "WA", "total": 30.0}),
        ];

        let err = validate_batch(&candidates).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { index: 1, field: "total" });
    }

    #[test]
    fn test_unparsable_total_fails() {
        let candidates = vec![json!({"orderId": "1", "buyer": "A", "state": "OH", "total": "not-a-number"})];
        let err = validate_batch(&candidates).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { index: 0, field: "total", .. }));
    }

    #[test]
    fn test_null_and_nested_string_fields_are_stringified() {
        let candidates = vec![
            json!({"orderId": "1", "buyer": null, "state": "oh", "total": 1}),
            json!({"orderId": ["2"], "buyer": "A", "state": {"code": "tx"}, "total": 2}),
        ];

        let orders = validate_batch(&candidates).unwrap();
        assert_eq!(orders[0].buyer, "null");
        assert_eq!(orders[1].order_id, r#"["2"]"#);
        assert_eq!(orders[1].state, r#"{"CODE":"TX"}"#);
    }

    #[test]
    fn test_boolean_total_counts_as_one_or_zero() {
        let candidates = vec![
            json!({"orderId": "1", "buyer": "A", "state": "OH", "total": true}),
            json!({"orderId": "2", "buyer": "B", "state": "OH", "total": false}),
        ];

        let orders = validate_batch(&candidates).unwrap();
        assert_eq!(orders[0].total, 1.0);
        assert_eq!(orders[1].total, 0.0);
    }

    #[test]
    fn test_null_or_nested_total_fails() {
        let null_total = vec![json!({"orderId": "1", "buyer": "A", "state": "OH", "total": null})];
        assert!(matches!(
            validate_batch(&null_total).unwrap_err(),
            ValidationError::InvalidField { field: "total", .. }
        ));

        let nested_total = vec![json!({"orderId": "1", "buyer": "A", "state": "OH", "total": [1]})];
        assert!(matches!(
            validate_batch(&nested_total).unwrap_err(),
            ValidationError::InvalidField { field: "total", .. }
        ));
    }

    #[test]
    fn test_non_finite_total_fails() {
        let candidates = vec![json!({"orderId": "1", "buyer": "A", "state": "OH", "total": "inf"})];
        assert!(validate_batch(&candidates).is_err());
    }

    #[test]
    fn test_non_object_candidate_fails() {
        let candidates = vec![json!("Order 1001: Buyer=John Davis")];
        assert_eq!(
            validate_batch(&candidates).unwrap_err(),
            ValidationError::NotAnObject { index: 0 }
        );
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(validate_batch(&[]).unwrap().is_empty());
    }
}
