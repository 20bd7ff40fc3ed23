//! Remote API trait for abstracted request/response access.

use herald_core::{HeraldError, HeraldResult};
use async_trait::async_trait;
use serde_json::Value;

/// The remote notification API, seen as a collaborator.
///
/// Successful responses are JSON envelopes carrying a `data` field.
/// Non-2xx responses surface as [`HeraldError::RemoteApi`], with the
/// structured field→message payload attached when the failure was a
/// validation failure. Timeouts and retries belong to the implementation;
/// callers assume a request either completes or returns an error.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Issue a GET request. `params` become query parameters.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> HeraldResult<Value>;

    /// Issue a POST request with a JSON body.
    async fn post(&self, path: &str, body: &Value) -> HeraldResult<Value>;

    /// Issue a PUT request with a JSON body.
    async fn put(&self, path: &str, body: &Value) -> HeraldResult<Value>;

    /// Issue a DELETE request.
    async fn delete(&self, path: &str) -> HeraldResult<Value>;
}

/// Extracts the `data` payload from a response envelope.
pub fn data_payload(mut envelope: Value) -> HeraldResult<Value> {
    match envelope.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(HeraldError::internal(
            "Remote response is missing the data payload",
        )),
    }
}
