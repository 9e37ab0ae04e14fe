pub mod controller;
pub mod runtime;
pub mod state;

use tokio::sync::oneshot;

use crate::{fetch::FetchCompletion, tracking::TrackingEvent};

pub use controller::{ControllerSnapshot, LifecycleController};
pub use runtime::{spawn_controller, ControllerHandle};
pub use state::{LifecycleState, TrackingSession};

/// Everything the control loop consumes, in arrival order.
pub enum ControlMessage {
    Event(TrackingEvent),
    FetchCompleted(FetchCompletion),
    Snapshot(oneshot::Sender<ControllerSnapshot>),
}
