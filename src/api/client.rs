use std::{
    path::Path,
    time::Duration,
};

use reqwest::{
    header::{
        ACCEPT_ENCODING,
        USER_AGENT,
    },
    Client,
    Response,
};
use serde::de::DeserializeOwned;

use super::types::{
    AgentsResponse,
    DownloadInfo,
    ErrorBody,
    GenerateRequest,
    GenerateResponse,
    MessageResponse,
    PreviewResponse,
    ProgressResponse,
    StoryPayload,
};
use crate::{
    config::AppConfig,
    core::{
        profile::StoryProfile,
        BookgenError,
    },
};

const CLIENT_AGENT: &str = concat!("bookgen/", env!("CARGO_PKG_VERSION"), " (+reqwest)");
const DOWNLOAD_ATTEMPTS: usize = 3;

pub fn http_client(timeout: Duration) -> Result<Client, BookgenError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BookgenError::Custom(format!("HTTP client build failed: {e}")))
}

/// Typed access to the generation backend's `/api` routes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    api_root: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, BookgenError> {
        Ok(Self { http: http_client(Duration::from_secs(120))?, api_root: config.api_root() })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BookgenError> {
        let response = self.http.get(self.url(path)).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn health(&self) -> Result<MessageResponse, BookgenError> {
        self.get_json("/").await
    }

    pub async fn agents(&self) -> Result<AgentsResponse, BookgenError> {
        self.get_json("/agents").await
    }

    pub async fn generate(&self, profile: &StoryProfile) -> Result<GenerateResponse, BookgenError> {
        let request = GenerateRequest { story_data: StoryPayload::from_profile(profile) };
        let response = self.http.post(self.url("/story/generate")).json(&request).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    pub async fn progress(&self, session_id: &str) -> Result<ProgressResponse, BookgenError> {
        self.get_json(&format!("/story/{session_id}/progress")).await
    }

    pub async fn preview(&self, session_id: &str) -> Result<PreviewResponse, BookgenError> {
        self.get_json(&format!("/story/{session_id}/preview")).await
    }

    pub async fn download_info(&self, session_id: &str) -> Result<DownloadInfo, BookgenError> {
        match self.get_json(&format!("/story/{session_id}/download")).await {
            Err(BookgenError::Backend { status: 400, .. }) => {
                Err(BookgenError::NotReady(session_id.to_string()))
            }
            other => other,
        }
    }

    /// Fetches the finished document into `path`, retrying transport failures.
    /// Returns the number of bytes written.
    pub async fn download_file(&self, session_id: &str, path: &Path) -> Result<u64, BookgenError> {
        let url = self.url(&format!("/story/{session_id}/file"));
        let mut attempts: usize = 0;
        loop {
            attempts += 1;

            let sent = self
                .http
                .get(&url)
                .header(USER_AGENT, CLIENT_AGENT)
                .header(ACCEPT_ENCODING, "identity")
                .send()
                .await;

            let response = match sent {
                Ok(r) => r,
                Err(e) if attempts < DOWNLOAD_ATTEMPTS => {
                    tracing::warn!("Download attempt {attempts} for {session_id} failed: {e}");
                    tokio::time::sleep(Duration::from_secs(2 * attempts as u64)).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let bytes = match ensure_success(response).await?.bytes().await {
                Ok(bytes) if !bytes.is_empty() => bytes,
                Ok(_) | Err(_) if attempts < DOWNLOAD_ATTEMPTS => {
                    tokio::time::sleep(Duration::from_secs(2 * attempts as u64)).await;
                    continue;
                }
                Ok(_) => {
                    return Err(BookgenError::Custom(format!("Backend sent an empty file for {session_id}")))
                }
                Err(e) => return Err(e.into()),
            };

            tokio::fs::write(path, &bytes).await?;
            tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
            return Ok(bytes.len() as u64);
        }
    }

    pub async fn cancel(&self, session_id: &str) -> Result<MessageResponse, BookgenError> {
        let response = self.http.delete(self.url(&format!("/story/{session_id}"))).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

/// Turns a non-2xx response into `BookgenError::Backend`, using FastAPI's
/// `detail` field when the body has one.
async fn ensure_success(response: Response) -> Result<Response, BookgenError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { detail: serde_json::Value::String(detail) }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => format!("HTTP error from {url}"),
        Err(_) => body,
    };
    Err(BookgenError::Backend { status: status.as_u16(), message })
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{
            AsyncReadExt,
            AsyncWriteExt,
        },
        net::TcpListener,
    };

    use super::*;

    /// Answers a single request with the given status line and JSON body.
    async fn serve_once(status: &'static str, body: &'static str) -> AppConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        AppConfig::with_backend_url(&format!("http://{address}/")).unwrap()
    }

    #[tokio::test]
    async fn health_reads_message() {
        let config = serve_once("200 OK", r#"{"message": "Book Generator V2 API"}"#).await;
        let client = BackendClient::new(&config).unwrap();
        assert!(client.api_root().ends_with("/api"));

        let health = client.health().await.unwrap();
        assert_eq!(health.message, "Book Generator V2 API");
    }

    #[tokio::test]
    async fn backend_detail_becomes_error_message() {
        let config = serve_once("404 Not Found", r#"{"detail": "Session not found"}"#).await;
        let client = BackendClient::new(&config).unwrap();

        match client.progress("missing").await {
            Err(BookgenError::Backend { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Session not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unfinished_download_is_not_ready() {
        let config =
            serve_once("400 Bad Request", r#"{"detail": "Story not ready for download"}"#).await;
        let client = BackendClient::new(&config).unwrap();

        let err = client.download_info("abc").await.unwrap_err();
        assert!(matches!(err, BookgenError::NotReady(id) if id == "abc"));
    }
}
