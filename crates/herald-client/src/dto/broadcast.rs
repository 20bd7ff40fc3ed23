//! Broadcast settings request types.

use serde::{Deserialize, Serialize};

/// Settings applied when a service is switched to broadcast sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastSettings {
    /// `training` or `live`.
    pub service_mode: String,
    /// Channel the broadcasts go out on (e.g. `severe`, `operator`).
    pub broadcast_channel: String,
    /// Mobile network restriction, `all` for none.
    pub provider_restriction: String,
}
