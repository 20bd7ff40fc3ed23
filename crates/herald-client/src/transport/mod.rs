//! HTTP transport to the remote notification API.

mod api_client;
mod rest_client;

pub use api_client::{data_payload, ApiClient};
pub use rest_client::RestApiClient;
