use crate::types::NormalizedOrder;

/// State names we recognize, checked in order; the first hit wins.
const STATE_KEYWORDS: [(&str, &str); 3] = [("ohio", "OH"), ("texas", "TX"), ("washington", "WA")];

const THRESHOLD_KEYWORD: &str = "over";

/// Intent pulled out of a free-text query by fixed keyword spotting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub state_filter: Option<String>,
    /// Exclusive lower bound on `total`.
    pub min_total: Option<f64>,
}

impl QueryFilter {
    /// Scans `query` case-insensitively. Anything unrecognized is ignored,
    /// including an "over" with no numeric token anywhere in the query.
    pub fn from_query(query: &str) -> Self {
        let q = query.to_lowercase();

        let state_filter = STATE_KEYWORDS
            .iter()
            .find(|(name, _)| q.contains(name))
            .map(|(_, code)| code.to_string());

        let min_total = if q.contains(THRESHOLD_KEYWORD) {
            q.split_whitespace().find_map(|token| token.parse::<f64>().ok())
        } else {
            None
        };

        Self { state_filter, min_total }
    }

    /// `None` and blank queries filter nothing.
    pub fn from_optional_query(query: Option<&str>) -> Self {
        query.map(Self::from_query).unwrap_or_default()
    }

    pub fn is_noop(&self) -> bool {
        self.state_filter.is_none() && self.min_total.is_none()
    }

    pub fn matches(&self, order: &NormalizedOrder) -> bool {
        if let Some(state) = &self.state_filter {
            if &order.state != state {
                return false;
            }
        }
        if let Some(min_total) = self.min_total {
            if order.total <= min_total {
                return false;
            }
        }
        true
    }

    /// Keeps matching orders in their original order.
    pub fn apply(&self, orders: Vec<NormalizedOrder>) -> Vec<NormalizedOrder> {
        if self.is_noop() {
            return orders;
        }
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }
}
