//! Entity-oriented clients over the remote API.

mod edit_errors;
mod invite_api_client;
mod service_api_client;
mod user_api_client;

pub use edit_errors::parse_edit_service_error;
pub use invite_api_client::InviteApiClient;
pub use service_api_client::ServiceApiClient;
pub use user_api_client::UserApiClient;
