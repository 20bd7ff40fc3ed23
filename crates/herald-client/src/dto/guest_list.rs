//! Guest list request types.

use serde::{Deserialize, Serialize};

/// Replacement contents for a service's guest list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestListUpdate {
    pub email_addresses: Vec<String>,
    pub phone_numbers: Vec<String>,
}
