use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use super::{FetchClient, FetchFailure, FetchRequest};

/// Fetches metadata documents and thumbnails over HTTP(S).
#[derive(Clone)]
pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl HttpFetchClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchFailure> {
        let url = request.url.as_str();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| classify(url, err))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchFailure::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchFailure::NetworkError(format!("{url} returned HTTP {status}")));
        }

        let body = response.bytes().await.map_err(|err| classify(url, err))?;
        Ok(body.to_vec())
    }
}

fn classify(url: &str, err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout(url.to_string())
    } else {
        FetchFailure::NetworkError(format!("{url}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchStage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use uuid::Uuid;

    /// Serves a single canned response, or holds the connection open when
    /// `response` is `None`.
    async fn serve_once(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
        });

        format!("http://{addr}/document.json")
    }

    fn request(url: String) -> FetchRequest {
        FetchRequest::new(url, FetchStage::Metadata, Uuid::new_v4())
    }

    fn client(timeout: Duration) -> HttpFetchClient {
        HttpFetchClient::new(timeout, "reco-content-test").unwrap()
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Length: 13\r\nConnection: close\r\n\r\n{\"ok\": true}\n",
        ))
        .await;

        let body = client(Duration::from_secs(5)).fetch(&request(url)).await.unwrap();
        assert_eq!(body, b"{\"ok\": true}\n".to_vec());
    }

    #[tokio::test]
    async fn maps_404_to_not_found() {
        let url = serve_once(Some(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;

        let err = client(Duration::from_secs(5)).fetch(&request(url.clone())).await.unwrap_err();
        assert_eq!(err, FetchFailure::NotFound(url));
    }

    #[tokio::test]
    async fn maps_server_errors_to_network_error() {
        let url = serve_once(Some(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;

        let err = client(Duration::from_secs(5)).fetch(&request(url)).await.unwrap_err();
        assert!(matches!(err, FetchFailure::NetworkError(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let url = serve_once(None).await;

        let err = client(Duration::from_millis(200)).fetch(&request(url.clone())).await.unwrap_err();
        assert_eq!(err, FetchFailure::Timeout(url));
    }
}
