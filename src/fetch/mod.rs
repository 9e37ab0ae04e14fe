pub mod http;
pub mod local;
pub mod source;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub use http::HttpFetchClient;
pub use local::LocalFetchClient;
pub use source::SourceFetchClient;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FetchStage {
    Metadata,
    Thumbnail,
}

/// Correlation token tying a completion back to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken {
    session_id: Uuid,
    request_id: Uuid,
}

impl FetchToken {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub stage: FetchStage,
    pub token: FetchToken,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, stage: FetchStage, session_id: Uuid) -> Self {
        Self {
            url: url.into(),
            stage,
            token: FetchToken::new(session_id),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("timed out fetching {0}")]
    Timeout(String),
    #[error("fetch canceled")]
    Canceled,
}

/// Retrieves the raw bytes behind a URL-like identifier.
///
/// Implementations never touch controller state; the result goes back to the
/// caller only. Cancellation is handled by [`spawn_fetch`] dropping the future.
#[async_trait]
pub trait FetchClient: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchFailure>;
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub token: FetchToken,
    pub stage: FetchStage,
    pub url: String,
    pub result: Result<Vec<u8>, FetchFailure>,
}

/// Handle to a fetch running in the background.
pub struct InFlightFetch {
    token: FetchToken,
    stage: FetchStage,
    cancel_token: CancellationToken,
}

impl InFlightFetch {
    pub fn token(&self) -> FetchToken {
        self.token
    }

    pub fn stage(&self) -> FetchStage {
        self.stage
    }

    /// Stops the fetch. Its completion still arrives, as `Canceled`, unless
    /// the task already delivered a result.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

/// Runs `request` on `client` in a background task and hands the completion to
/// `deliver`, which is called exactly once.
pub fn spawn_fetch<F>(client: Arc<dyn FetchClient>, request: FetchRequest, deliver: F) -> InFlightFetch
where
    F: FnOnce(FetchCompletion) + Send + 'static,
{
    let cancel_token = CancellationToken::new();
    let token_clone = cancel_token.clone();
    let token = request.token;
    let stage = request.stage;

    tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = token_clone.cancelled() => Err(FetchFailure::Canceled),
            result = client.fetch(&request) => result,
        };

        deliver(FetchCompletion {
            token: request.token,
            stage: request.stage,
            url: request.url,
            result,
        });
    });

    InFlightFetch {
        token,
        stage,
        cancel_token,
    }
}
