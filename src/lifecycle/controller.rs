use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    content::{self, ContentPhase, ContentRecord, ContentState, Thumbnail},
    fetch::{self, FetchClient, FetchCompletion, FetchFailure, FetchRequest, FetchStage, InFlightFetch},
    presentation::PresentationSink,
    settings::{MetadataSource, Settings},
    tracking::{Recognizer, TrackingEvent},
};

use super::{ControlMessage, LifecycleState, TrackingSession};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSnapshot {
    pub state: LifecycleState,
    pub phase: ContentPhase,
    pub session: Option<TrackingSession>,
    pub record: Option<ContentRecord>,
    pub thumbnail_size: Option<(u32, u32)>,
    pub fetch_in_flight: Option<FetchStage>,
    pub menu_visible: bool,
    pub augmentation_visible: bool,
}

/// Last visibility values pushed to the sink, so per-frame re-evaluation only
/// emits on change.
#[derive(Debug, Default)]
struct Indicators {
    augmentation: bool,
    spinner: Option<bool>,
    cancel: Option<bool>,
}

/// Drives the two-stage content load for the current tracking session and
/// keeps the augmentation, spinner and cancel affordance in step with it.
///
/// Owns [`ContentState`] outright. Fetch results come back as
/// [`ControlMessage::FetchCompleted`] on the loop channel and are applied
/// only if their token matches the fetch currently outstanding.
pub struct LifecycleController {
    state: LifecycleState,
    content: ContentState,
    session: Option<TrackingSession>,
    in_flight: Option<InFlightFetch>,
    menu_visible: bool,
    indicators: Indicators,
    metadata_source: MetadataSource,
    call_to_action_url: Option<String>,
    fetcher: Arc<dyn FetchClient>,
    recognizer: Arc<dyn Recognizer>,
    sink: Box<dyn PresentationSink>,
    messages: UnboundedSender<ControlMessage>,
}

impl LifecycleController {
    pub fn new(
        settings: &Settings,
        fetcher: Arc<dyn FetchClient>,
        recognizer: Arc<dyn Recognizer>,
        sink: Box<dyn PresentationSink>,
        messages: UnboundedSender<ControlMessage>,
    ) -> Self {
        Self {
            state: LifecycleState::Idle,
            content: ContentState::new(),
            session: None,
            in_flight: None,
            menu_visible: false,
            indicators: Indicators::default(),
            metadata_source: settings.metadata_source.clone(),
            call_to_action_url: settings.call_to_action_url.clone(),
            fetcher,
            recognizer,
            sink,
            messages,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state,
            phase: self.content.phase(),
            session: self.session.clone(),
            record: self.content.record().cloned(),
            thumbnail_size: self.content.thumbnail().map(Thumbnail::dimensions),
            fetch_in_flight: self.in_flight.as_ref().map(InFlightFetch::stage),
            menu_visible: self.menu_visible,
            augmentation_visible: self.indicators.augmentation,
        }
    }

    pub fn handle_event(&mut self, event: TrackingEvent) {
        log_debug!("event {:?} in state {:?}", event, self.state);

        match event {
            TrackingEvent::TargetCreated { target_id } => self.start_session(target_id),
            TrackingEvent::TargetDeleted => self.end_session("target deleted"),
            TrackingEvent::Cancel => {
                self.recognizer.set_enabled(true);
                self.end_session("canceled by user");
            }
            TrackingEvent::TrackingFound => {
                if self.state == LifecycleState::Displaying {
                    self.sink.play_animation_to_3d();
                }
            }
            TrackingEvent::TrackingLost => {
                if self.state == LifecycleState::Displaying {
                    self.sink.play_animation_to_2d();
                }
            }
            TrackingEvent::MenuVisibilityChanged { visible } => self.set_menu_visible(visible),
            TrackingEvent::AugmentationTapped => self.open_call_to_action(),
        }

        self.refresh_indicators();
    }

    pub fn handle_completion(&mut self, completion: FetchCompletion) {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.token() == completion.token);
        if !is_current {
            log_debug!(
                "dropping stale {:?} result for {} (session {})",
                completion.stage,
                completion.url,
                completion.token.session_id()
            );
            return;
        }
        self.in_flight = None;

        match completion.stage {
            FetchStage::Metadata => self.on_metadata(&completion.url, completion.result),
            FetchStage::Thumbnail => self.on_thumbnail(completion.url, completion.result),
        }

        self.refresh_indicators();
    }

    /// Per-frame re-evaluation of the spinner and cancel affordance.
    pub fn tick(&mut self) {
        self.refresh_indicators();
    }

    /// Cancels any outstanding fetch. Called when the control loop exits.
    pub fn shutdown(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel();
        }
    }

    fn start_session(&mut self, target_id: String) {
        if self.session.is_some() {
            self.end_session("superseded by a new target");
        }

        let session = TrackingSession::begin(target_id);
        let url = self.metadata_source.metadata_url(&session.target_id);
        log_info!(
            "session {} started for target {}",
            session.id,
            session.target_id
        );

        self.session = Some(session);
        self.content.begin_metadata();
        self.state = LifecycleState::LoadingMetadata;
        self.issue_fetch(url, FetchStage::Metadata);
    }

    fn end_session(&mut self, reason: &str) {
        if let Some(in_flight) = self.in_flight.take() {
            log_debug!("canceling in-flight {:?} fetch", in_flight.stage());
            in_flight.cancel();
        }
        if let Some(session) = self.session.take() {
            log_info!(
                "session {} ended after {}ms: {}",
                session.id,
                session.elapsed_ms(),
                reason
            );
        }

        self.content.clear();
        self.state = LifecycleState::Idle;
        self.hide_augmentation();
    }

    fn issue_fetch(&mut self, url: String, stage: FetchStage) {
        let Some(session) = self.session.as_ref() else {
            log_warn!("not issuing {:?} fetch for {}: no active session", stage, url);
            return;
        };

        log_debug!("fetching {:?} from {}", stage, url);
        let request = FetchRequest::new(url, stage, session.id);
        let messages = self.messages.clone();
        let in_flight = fetch::spawn_fetch(self.fetcher.clone(), request, move |completion| {
            // Closed only once the loop has shut down; nothing left to apply it to.
            let _ = messages.send(ControlMessage::FetchCompleted(completion));
        });
        self.in_flight = Some(in_flight);
    }

    fn on_metadata(&mut self, url: &str, result: Result<Vec<u8>, FetchFailure>) {
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                log_error!("metadata fetch from {} failed: {}", url, err);
                self.fail_load();
                return;
            }
        };

        let record = match content::parse(&bytes) {
            Ok(record) => record,
            Err(err) => {
                log_error!("metadata from {} rejected: {}", url, err);
                self.fail_load();
                return;
            }
        };

        log_info!("metadata loaded: \"{}\"", record.title);
        self.sink.update_content(&record);
        let thumbnail_url = record.thumbnail_url.clone();
        self.content.set_record(record);
        self.state = LifecycleState::LoadingThumbnail;
        self.issue_fetch(thumbnail_url, FetchStage::Thumbnail);
    }

    fn on_thumbnail(&mut self, url: String, result: Result<Vec<u8>, FetchFailure>) {
        let decoded = match result {
            Ok(bytes) => Thumbnail::decode(url.as_str(), &bytes).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match decoded {
            Ok(thumbnail) => {
                self.sink.update_thumbnail(&thumbnail);
                if let Err(err) = self.content.set_thumbnail(thumbnail) {
                    log_error!("{}", err);
                    self.content.finish_without_thumbnail();
                }
            }
            Err(reason) => {
                log_warn!(
                    "thumbnail {} unavailable ({}); showing metadata only",
                    url,
                    reason
                );
                self.content.finish_without_thumbnail();
            }
        }

        if self.menu_visible {
            self.state = LifecycleState::Hidden;
        } else {
            self.state = LifecycleState::Displaying;
            self.show_augmentation();
        }
    }

    /// Stage-one failure: nothing is shown and no retry is attempted.
    fn fail_load(&mut self) {
        self.content.clear();
        self.state = LifecycleState::Idle;
    }

    fn set_menu_visible(&mut self, visible: bool) {
        self.menu_visible = visible;

        match (visible, self.state) {
            (true, LifecycleState::Displaying) => {
                self.state = LifecycleState::Hidden;
                self.hide_augmentation();
            }
            (false, LifecycleState::Hidden) => {
                self.state = LifecycleState::Displaying;
                self.show_augmentation();
            }
            _ => {}
        }
    }

    fn open_call_to_action(&mut self) {
        if self.state != LifecycleState::Displaying || self.menu_visible {
            return;
        }
        let Some(record) = self.content.record() else {
            return;
        };

        match record.detail_url.clone().or_else(|| self.call_to_action_url.clone()) {
            Some(url) => self.sink.open_link(&url),
            None => log_debug!("tap ignored: no call-to-action destination"),
        }
    }

    fn show_augmentation(&mut self) {
        self.sink.show_augmentation();
        self.indicators.augmentation = true;
    }

    fn hide_augmentation(&mut self) {
        self.sink.hide_augmentation();
        self.indicators.augmentation = false;
    }

    fn refresh_indicators(&mut self) {
        let spinner = self.state.is_loading();
        if self.indicators.spinner != Some(spinner) {
            self.sink.set_spinner_visible(spinner);
            self.indicators.spinner = Some(spinner);
        }

        let cancel = self.recognizer.is_initialized() && !self.recognizer.is_enabled();
        if self.indicators.cancel != Some(cancel) {
            self.sink.set_cancel_visible(cancel);
            self.indicators.cancel = Some(cancel);
        }
    }
}
