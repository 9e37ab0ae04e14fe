use serde::{Deserialize, Serialize};

/// Descriptive metadata for a recognized target, as parsed from its metadata
/// document. Immutable once built; the controller replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub title: String,
    pub author: String,
    pub average_rating: f32,
    pub rating_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_price: Option<String>,
    /// Where the stage-two thumbnail is fetched from. Always non-empty.
    pub thumbnail_url: String,
    /// Call-to-action destination opened when the augmentation is tapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl ContentRecord {
    /// Canonical JSON form. Feeding it back through the parser yields an equal record.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
