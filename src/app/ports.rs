use async_trait::async_trait;

use crate::error::NormalizerError;
use crate::types::RawOrder;

/// Supplies raw order lines.
///
/// Transport failures are the adapter's to log; callers only ever see an
/// empty list, which the pipeline treats as a valid "nothing to do" input.
#[async_trait]
pub trait RawOrderSourcePort: Send + Sync {
    async fn fetch(&self, limit: usize) -> Vec<RawOrder>;

    async fn fetch_by_id(&self, _order_id: &str) -> Option<RawOrder> {
        None
    }
}

/// Converts a batch of raw lines into text that claims to be a JSON array of
/// `{orderId, buyer, state, total}` objects.
///
/// The text is not trusted. An `Err` means the call itself failed, which is
/// distinct from returning text that doesn't decode.
#[async_trait]
pub trait PrimaryNormalizerPort: Send + Sync {
    async fn normalize(&self, raw_orders: &[RawOrder]) -> Result<String, NormalizerError>;
}
