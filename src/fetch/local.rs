use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FetchClient, FetchFailure, FetchRequest};

const FILE_SCHEME: &str = "file://";

/// Reads documents bundled on local storage. Relative identifiers resolve
/// against `base_dir`.
#[derive(Debug, Clone)]
pub struct LocalFetchClient {
    base_dir: PathBuf,
}

impl LocalFetchClient {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, identifier: &str) -> PathBuf {
        let raw = identifier.strip_prefix(FILE_SCHEME).unwrap_or(identifier);
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[async_trait]
impl FetchClient for LocalFetchClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchFailure> {
        let path = self.resolve(&request.url);
        tokio::fs::read(&path).await.map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchFailure::NotFound(path.display().to_string()),
            _ => FetchFailure::NetworkError(format!("{}: {err}", path.display())),
        })
    }
}
