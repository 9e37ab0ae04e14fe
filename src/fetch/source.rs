use std::sync::Arc;

use async_trait::async_trait;

use super::{FetchClient, FetchFailure, FetchRequest};

/// Routes `http://` and `https://` identifiers to the remote client and
/// everything else to local storage, so metadata and thumbnails can live in
/// either place.
pub struct SourceFetchClient {
    remote: Arc<dyn FetchClient>,
    local: Arc<dyn FetchClient>,
}

impl SourceFetchClient {
    pub fn new(remote: Arc<dyn FetchClient>, local: Arc<dyn FetchClient>) -> Self {
        Self { remote, local }
    }
}

pub fn is_remote(identifier: &str) -> bool {
    let lower = identifier.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl FetchClient for SourceFetchClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchFailure> {
        if is_remote(&request.url) {
            self.remote.fetch(request).await
        } else {
            self.local.fetch(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchStage;
    use uuid::Uuid;

    struct Fixed(&'static [u8]);

    #[async_trait]
    impl FetchClient for Fixed {
        async fn fetch(&self, _request: &FetchRequest) -> Result<Vec<u8>, FetchFailure> {
            Ok(self.0.to_vec())
        }
    }

    #[test]
    fn detects_remote_schemes() {
        assert!(is_remote("https://cdn.example.com/a.png"));
        assert!(is_remote("HTTP://cdn.example.com/a.png"));
        assert!(!is_remote("file:///tmp/a.png"));
        assert!(!is_remote("content.json"));
    }

    #[tokio::test]
    async fn routes_by_scheme() {
        let client = SourceFetchClient::new(Arc::new(Fixed(b"remote")), Arc::new(Fixed(b"local")));

        let remote = FetchRequest::new("https://x/y.json", FetchStage::Metadata, Uuid::new_v4());
        let local = FetchRequest::new("y.json", FetchStage::Metadata, Uuid::new_v4());

        assert_eq!(client.fetch(&remote).await.unwrap(), b"remote".to_vec());
        assert_eq!(client.fetch(&local).await.unwrap(), b"local".to_vec());
    }
}
