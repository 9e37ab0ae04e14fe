pub mod recognizer;

use serde::{Deserialize, Serialize};

pub use recognizer::{Recognizer, SharedRecognizer};

/// Inputs the tracking subsystem and the user surface feed into the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum TrackingEvent {
    TargetCreated {
        #[serde(rename = "targetId")]
        target_id: String,
    },
    TargetDeleted,
    TrackingFound,
    TrackingLost,
    /// User pressed the cancel affordance.
    Cancel,
    /// Host application opened or closed its menu overlay.
    MenuVisibilityChanged { visible: bool },
    /// Host hit-testing reported a tap on the augmentation.
    AugmentationTapped,
}

/// Raw status reported by the tracker for the trackable hosting the augmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackableStatus {
    NoPresence,
    Limited,
    Detected,
    Tracked,
    ExtendedTracked,
}

impl TrackableStatus {
    pub fn is_tracking(self) -> bool {
        matches!(
            self,
            TrackableStatus::Detected | TrackableStatus::Tracked | TrackableStatus::ExtendedTracked
        )
    }
}

impl TrackingEvent {
    /// Maps a trackable status change onto found/lost. Only the new status matters.
    pub fn from_status_change(_previous: TrackableStatus, current: TrackableStatus) -> Self {
        if current.is_tracking() {
            TrackingEvent::TrackingFound
        } else {
            TrackingEvent::TrackingLost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_statuses_map_to_found() {
        for status in [
            TrackableStatus::Detected,
            TrackableStatus::Tracked,
            TrackableStatus::ExtendedTracked,
        ] {
            assert_eq!(
                TrackingEvent::from_status_change(TrackableStatus::NoPresence, status),
                TrackingEvent::TrackingFound
            );
        }
    }

    #[test]
    fn other_statuses_map_to_lost() {
        for status in [TrackableStatus::NoPresence, TrackableStatus::Limited] {
            assert_eq!(
                TrackingEvent::from_status_change(TrackableStatus::Tracked, status),
                TrackingEvent::TrackingLost
            );
        }
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: TrackingEvent =
            serde_json::from_str(r#"{"type": "targetCreated", "targetId": "book-42"}"#).unwrap();
        assert_eq!(
            event,
            TrackingEvent::TargetCreated {
                target_id: "book-42".into()
            }
        );
    }
}
