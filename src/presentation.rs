use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::content::{ContentRecord, Thumbnail};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Commands the controller issues to the rendering side. All are
/// fire-and-forget; the controller never reads back rendering or animation
/// completion.
pub trait PresentationSink: Send {
    fn show_augmentation(&mut self);
    fn hide_augmentation(&mut self);
    fn set_spinner_visible(&mut self, visible: bool);
    fn set_cancel_visible(&mut self, visible: bool);
    fn play_animation_to_2d(&mut self);
    fn play_animation_to_3d(&mut self);
    /// Fill the augmentation with the parsed record.
    fn update_content(&mut self, record: &ContentRecord);
    fn update_thumbnail(&mut self, thumbnail: &Thumbnail);
    /// Navigate to the call-to-action destination.
    fn open_link(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "command")]
pub enum PresentationCommand {
    ShowAugmentation,
    HideAugmentation,
    SetSpinnerVisible { visible: bool },
    SetCancelVisible { visible: bool },
    PlayAnimationTo2D,
    PlayAnimationTo3D,
    UpdateContent { title: String },
    UpdateThumbnail { width: u32, height: u32 },
    OpenLink { url: String },
}

/// Writes every command to the log. Used by the console binary.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl PresentationSink for LoggingSink {
    fn show_augmentation(&mut self) {
        log_info!("present: show augmentation");
    }

    fn hide_augmentation(&mut self) {
        log_info!("present: hide augmentation");
    }

    fn set_spinner_visible(&mut self, visible: bool) {
        log_info!("present: spinner visible={}", visible);
    }

    fn set_cancel_visible(&mut self, visible: bool) {
        log_info!("present: cancel visible={}", visible);
    }

    fn play_animation_to_2d(&mut self) {
        log_info!("present: animate to 2D");
    }

    fn play_animation_to_3d(&mut self) {
        log_info!("present: animate to 3D");
    }

    fn update_content(&mut self, record: &ContentRecord) {
        log_info!(
            "present: content \"{}\" by {} ({} ratings, avg {:.1})",
            record.title,
            record.author,
            record.rating_count,
            record.average_rating
        );
    }

    fn update_thumbnail(&mut self, thumbnail: &Thumbnail) {
        let (width, height) = thumbnail.dimensions();
        log_info!("present: thumbnail {}x{} from {}", width, height, thumbnail.source_url());
    }

    fn open_link(&mut self, url: &str) {
        log_info!("present: open {}", url);
    }
}

/// Keeps an ordered log of issued commands. Clones share the same log, so a
/// host can hand one clone to the controller and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<PresentationCommand>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<PresentationCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn count(&self, command: &PresentationCommand) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|recorded| *recorded == command)
            .count()
    }

    fn push(&self, command: PresentationCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

impl PresentationSink for RecordingSink {
    fn show_augmentation(&mut self) {
        self.push(PresentationCommand::ShowAugmentation);
    }

    fn hide_augmentation(&mut self) {
        self.push(PresentationCommand::HideAugmentation);
    }

    fn set_spinner_visible(&mut self, visible: bool) {
        self.push(PresentationCommand::SetSpinnerVisible { visible });
    }

    fn set_cancel_visible(&mut self, visible: bool) {
        self.push(PresentationCommand::SetCancelVisible { visible });
    }

    fn play_animation_to_2d(&mut self) {
        self.push(PresentationCommand::PlayAnimationTo2D);
    }

    fn play_animation_to_3d(&mut self) {
        self.push(PresentationCommand::PlayAnimationTo3D);
    }

    fn update_content(&mut self, record: &ContentRecord) {
        self.push(PresentationCommand::UpdateContent {
            title: record.title.clone(),
        });
    }

    fn update_thumbnail(&mut self, thumbnail: &Thumbnail) {
        let (width, height) = thumbnail.dimensions();
        self.push(PresentationCommand::UpdateThumbnail { width, height });
    }

    fn open_link(&mut self, url: &str) {
        self.push(PresentationCommand::OpenLink { url: url.to_string() });
    }
}
