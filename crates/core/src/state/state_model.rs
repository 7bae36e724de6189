use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton sync configuration and progress marker.
///
/// `last_sync_at` serializes as an explicit `null` until the first sync
/// completes so consumers can distinguish "never ran" without probing for
/// a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    #[serde(default)]
    pub agent_enabled: bool,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}
