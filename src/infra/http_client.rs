use crate::app::ports::RawOrderSourcePort;
use crate::config::OrderApiConfig;
use crate::types::RawOrder;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    raw_orders: Vec<RawOrder>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    raw_order: Option<RawOrder>,
}

/// Raw order source backed by the customer order API.
///
/// Every failure is logged here and surfaces as "no orders".
pub struct ReqwestOrderSource {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestOrderSource {
    pub fn new(config: &OrderApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RawOrderSourcePort for ReqwestOrderSource {
    async fn fetch(&self, limit: usize) -> Vec<RawOrder> {
        let url = format!("{}/orders", self.base_url);
        let mut request = self.client.get(&url);
        if limit > 0 {
            request = request.query(&[("limit", limit)]);
        }

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("Order API fetch failed: {}", e);
                return Vec::new();
            }
        };

        if resp.status() != StatusCode::OK {
            error!("Order API fetch failed with status {}", resp.status());
            return Vec::new();
        }

        match resp.json::<OrdersResponse>().await {
            Ok(body) => {
                info!("Fetched {} raw orders", body.raw_orders.len());
                body.raw_orders
            }
            Err(e) => {
                error!("Order API returned an unreadable body: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_by_id(&self, order_id: &str) -> Option<RawOrder> {
        let url = format!("{}/order/{}", self.base_url, order_id);
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("Order API lookup failed: {}", e);
                return None;
            }
        };

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(order_id, "Order not found");
            return None;
        }

        match resp.json::<OrderResponse>().await {
            Ok(body) => body.raw_order,
            Err(e) => {
                error!("Order API returned an unreadable body: {}", e);
                None
            }
        }
    }
}
