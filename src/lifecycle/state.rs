use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    Idle,
    LoadingMetadata,
    LoadingThumbnail,
    Displaying,
    /// Content is ready but the augmentation is hidden under the host menu.
    Hidden,
}

impl Default for LifecycleState {
    fn default() -> Self {
        LifecycleState::Idle
    }
}

impl LifecycleState {
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            LifecycleState::LoadingMetadata | LifecycleState::LoadingThumbnail
        )
    }
}

/// Lifetime of one recognized target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSession {
    pub id: Uuid,
    pub target_id: String,
    pub started_at: DateTime<Utc>,
}

impl TrackingSession {
    pub fn begin(target_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_id: target_id.into(),
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
