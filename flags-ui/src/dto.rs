use serde::{Deserialize, Serialize};

pub use flag_registry::{Flag, FlagKey, Reasons};

/// Body the backend sends back after a flag is queued for manual review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAck {
    pub status: String,
    pub platform: String,
    pub handle: String,
}
