use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    fetch::FetchClient,
    presentation::PresentationSink,
    settings::Settings,
    tracking::{Recognizer, TrackingEvent},
};

use super::{ControlMessage, ControllerSnapshot, LifecycleController};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Sending side of a running control loop.
pub struct ControllerHandle {
    messages: mpsc::UnboundedSender<ControlMessage>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Starts the control loop on the current tokio runtime. Tracking events,
/// fetch completions and frame ticks are all processed on this one task.
pub fn spawn_controller(
    settings: &Settings,
    fetcher: Arc<dyn FetchClient>,
    recognizer: Arc<dyn Recognizer>,
    sink: Box<dyn PresentationSink>,
) -> ControllerHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let controller = LifecycleController::new(settings, fetcher, recognizer, sink, tx.clone());

    let cancel_token = CancellationToken::new();
    let handle = tokio::spawn(control_loop(
        controller,
        rx,
        settings.frame_interval(),
        cancel_token.clone(),
    ));

    ControllerHandle {
        messages: tx,
        cancel_token,
        handle: Some(handle),
    }
}

impl ControllerHandle {
    pub fn send(&self, event: TrackingEvent) -> Result<()> {
        self.messages
            .send(ControlMessage::Event(event))
            .map_err(|_| anyhow!("control loop is no longer running"))
    }

    /// State as of every message sent before this call.
    pub async fn snapshot(&self) -> Result<ControllerSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.messages
            .send(ControlMessage::Snapshot(reply_tx))
            .map_err(|_| anyhow!("control loop is no longer running"))?;
        reply_rx
            .await
            .context("control loop dropped the snapshot request")
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.cancel_token.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await.context("control loop task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn control_loop(
    mut controller: LifecycleController,
    mut messages: mpsc::UnboundedReceiver<ControlMessage>,
    frame_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!("control loop started ({}ms frames)", frame_interval.as_millis());

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("control loop shutting down");
                break;
            }
            message = messages.recv() => match message {
                Some(ControlMessage::Event(event)) => controller.handle_event(event),
                Some(ControlMessage::FetchCompleted(completion)) => controller.handle_completion(completion),
                Some(ControlMessage::Snapshot(reply)) => {
                    if reply.send(controller.snapshot()).is_err() {
                        log_debug!("snapshot requester went away");
                    }
                }
                None => break,
            },
            _ = ticker.tick() => controller.tick(),
        }
    }

    controller.shutdown();
}
