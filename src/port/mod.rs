use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::ObservabilityError;

/// Write seam between the capture facade and the backing store.
///
/// This trait is dyn-compatible by using boxed futures instead of
/// `impl Future`.
pub trait LogSink: Send + Sync {
    fn append(
        &self,
        record: Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), ObservabilityError>> + Send + '_>>;
}
