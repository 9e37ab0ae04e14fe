use anyhow::{ensure, Result};
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

use super::ContentRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContentPhase {
    /// No fetch outstanding. A record without a thumbnail can sit here after a
    /// failed thumbnail fetch.
    Idle,
    FetchingMetadata,
    FetchingThumbnail,
    Ready,
}

impl Default for ContentPhase {
    fn default() -> Self {
        ContentPhase::Idle
    }
}

/// Decoded thumbnail image for the current record.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    source_url: String,
    image: DynamicImage,
}

impl Thumbnail {
    pub fn decode(source_url: impl Into<String>, bytes: &[u8]) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self {
            source_url: source_url.into(),
            image,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Content loaded for the active tracking session.
///
/// `thumbnail` is only ever set on top of a `record`, and `phase` is `Ready`
/// exactly when both are present.
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    record: Option<ContentRecord>,
    thumbnail: Option<Thumbnail>,
    phase: ContentPhase,
}

impl ContentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Option<&ContentRecord> {
        self.record.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn phase(&self) -> ContentPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            ContentPhase::FetchingMetadata | ContentPhase::FetchingThumbnail
        )
    }

    /// Drops any previous content and marks the metadata fetch as outstanding.
    pub fn begin_metadata(&mut self) {
        *self = Self {
            phase: ContentPhase::FetchingMetadata,
            ..Self::default()
        };
    }

    /// Stores the parsed record; the thumbnail fetch becomes outstanding.
    pub fn set_record(&mut self, record: ContentRecord) {
        self.record = Some(record);
        self.thumbnail = None;
        self.phase = ContentPhase::FetchingThumbnail;
    }

    pub fn set_thumbnail(&mut self, thumbnail: Thumbnail) -> Result<()> {
        ensure!(
            self.record.is_some(),
            "thumbnail {} arrived without a content record",
            thumbnail.source_url()
        );
        self.thumbnail = Some(thumbnail);
        self.phase = ContentPhase::Ready;
        Ok(())
    }

    /// Thumbnail stage gave up; keep the record for a metadata-only display.
    pub fn finish_without_thumbnail(&mut self) {
        self.thumbnail = None;
        self.phase = ContentPhase::Idle;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
