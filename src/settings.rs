use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const SETTINGS_PATH_ENV: &str = "RECO_CONTENT_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "reco-content.json";

/// Where a target's metadata document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MetadataSource {
    /// `server_url` is prefixed to the target id reported by the recognizer.
    Network {
        #[serde(rename = "serverUrl")]
        server_url: String,
    },
    /// One bundled document served for every target.
    Local { path: String },
}

impl Default for MetadataSource {
    fn default() -> Self {
        MetadataSource::Local {
            path: "content.json".into(),
        }
    }
}

impl MetadataSource {
    pub fn metadata_url(&self, target_id: &str) -> String {
        match self {
            MetadataSource::Network { server_url } => format!("{server_url}{target_id}"),
            MetadataSource::Local { path } => path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub metadata_source: MetadataSource,
    /// Base directory for relative local identifiers.
    pub local_root: PathBuf,
    pub request_timeout_secs: u64,
    pub frame_interval_ms: u64,
    /// Destination opened on tap when the record has no detail url.
    pub call_to_action_url: Option<String>,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_source: MetadataSource::default(),
            local_root: PathBuf::from("."),
            request_timeout_secs: 10,
            frame_interval_ms: 33,
            call_to_action_url: None,
            user_agent: format!("reco-content/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "Ignoring malformed settings in {}: {}; using defaults",
                    path.display(),
                    err
                );
                Settings::default()
            })
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Opens the file named by `RECO_CONTENT_SETTINGS`, or `reco-content.json`
    /// in the working directory.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn settings(&self) -> Settings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"metadataSource": {"kind": "network", "serverUrl": "https://api.example.com/targets/"}}"#,
        )
        .unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(
            settings.metadata_source.metadata_url("abc123"),
            "https://api.example.com/targets/abc123"
        );
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.frame_interval(), Duration::from_millis(33));
    }

    #[test]
    fn local_source_ignores_target_id() {
        let source = MetadataSource::Local {
            path: "bundled/book.json".into(),
        };
        assert_eq!(source.metadata_url("whatever"), "bundled/book.json");
    }

    #[test]
    fn update_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.settings();
        settings.call_to_action_url = Some("https://shop.example.com".into());
        store.update(settings.clone()).unwrap();

        assert_eq!(SettingsStore::new(path).unwrap().settings(), settings);
    }
}
