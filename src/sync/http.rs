//! HTTP/JSON client for the prediction backend

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{
    AnnotationBackend, LoadAnnotationRequest, LoadAnnotationResponse, PredictionRequest,
    PredictionResponse, SaveAnnotationRequest, SaveAnnotationResponse,
};
use crate::config::Config;
use crate::{Error, Result};

/// Backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        log::debug!("POST {url}");
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Domain(format!("{path} responded with {status}: {detail}")));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|err| Error::Transport(format!("failed to decode {path} response: {err}")))
    }
}

impl AnnotationBackend for HttpBackend {
    async fn generate_prediction(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        self.post("generate_prediction", request).await
    }

    async fn save_annotation(
        &self,
        request: &SaveAnnotationRequest,
    ) -> Result<SaveAnnotationResponse> {
        self.post("save_annotation", request).await
    }

    async fn load_annotation(
        &self,
        request: &LoadAnnotationRequest,
    ) -> Result<LoadAnnotationResponse> {
        self.post("load_annotation", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnnotationState;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one connection with a canned HTTP reply, returning the base URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Consume request headers and the declared body
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend {
            client: Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn save_request() -> SaveAnnotationRequest {
        SaveAnnotationRequest::new("42", &AnnotationState::new())
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.endpoint("save_annotation"),
            "http://localhost:8000/save_annotation/"
        );
    }

    #[tokio::test]
    async fn test_success_decodes_body() {
        let url = serve_once("200 OK", r#"{"message": "saved"}"#).await;
        let response = backend(&url).save_annotation(&save_request()).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("saved"));
    }

    #[tokio::test]
    async fn test_error_status_is_domain_failure() {
        let url = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#).await;
        let err = backend(&url)
            .save_annotation(&save_request())
            .await
            .unwrap_err();
        assert!(err.is_domain(), "{err:?}");
        assert!(err.to_string().contains("500"), "{err}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_failure() {
        let url = serve_once("200 OK", "{not json").await;
        let err = backend(&url)
            .load_annotation(&LoadAnnotationRequest {
                taxa_id: "42".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = backend(&format!("http://{addr}"))
            .save_annotation(&save_request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
    }
}
