//! REST client for the backend's dashboard endpoints.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::types::{ChatReply, ChatRequest, LogEntry, MetricSample, ProcessSnapshot};

pub const METRICS_PATH: &str = "system-metrics";
pub const LOGS_PATH: &str = "logs";
pub const SNAPSHOTS_PATH: &str = "processes-snapshots";
pub const CHAT_PATH: &str = "chatbot";

/// Where the dashboard gets its data from. `HttpBackend` in production,
/// in-memory fakes in tests.
pub trait DashboardSource: Send + Sync + 'static {
    fn metrics(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MetricSample>, FetchError>> + Send;

    fn logs(&self, limit: usize) -> impl Future<Output = Result<Vec<LogEntry>, FetchError>> + Send;

    fn process_snapshots(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ProcessSnapshot>, FetchError>> + Send;

    fn chat(&self, prompt: String) -> impl Future<Output = Result<String, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url, timeout: Duration, tls_ca: Option<&Path>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path).map_err(|e| FetchError::Tls {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| FetchError::Tls {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(cert);
        }
        Ok(Self {
            client: builder.build()?,
            base: with_trailing_slash(base),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, limit: usize) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        debug!(endpoint = %url, limit, "GET");
        let resp = self.client.get(url.clone()).query(&[("limit", limit)]).send().await?;
        decode(url, resp).await
    }
}

impl DashboardSource for HttpBackend {
    async fn metrics(&self, limit: usize) -> Result<Vec<MetricSample>, FetchError> {
        self.get_json(METRICS_PATH, limit).await
    }

    async fn logs(&self, limit: usize) -> Result<Vec<LogEntry>, FetchError> {
        self.get_json(LOGS_PATH, limit).await
    }

    async fn process_snapshots(&self, limit: usize) -> Result<Vec<ProcessSnapshot>, FetchError> {
        self.get_json(SNAPSHOTS_PATH, limit).await
    }

    async fn chat(&self, prompt: String) -> Result<String, FetchError> {
        let url = self.endpoint(CHAT_PATH)?;
        debug!(endpoint = %url, "POST");
        let resp = self
            .client
            .post(url.clone())
            .json(&ChatRequest { prompt: &prompt })
            .send()
            .await?;
        let reply: ChatReply = decode(url, resp).await?;
        Ok(reply.answer)
    }
}

async fn decode<T: DeserializeOwned>(url: Url, resp: reqwest::Response) -> Result<T, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            endpoint: url.to_string(),
            status,
        });
    }
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        endpoint: url.to_string(),
        source,
    })
}

// Url::join replaces the last path segment unless the base ends with '/'.
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(Url::parse(base).unwrap(), Duration::from_secs(1), None).unwrap()
    }

    #[test]
    fn endpoints_resolve_against_root() {
        let b = backend("http://127.0.0.1:5000");
        assert_eq!(
            b.endpoint(METRICS_PATH).unwrap().as_str(),
            "http://127.0.0.1:5000/system-metrics"
        );
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let b = backend("http://example.com/dash");
        assert_eq!(b.endpoint(CHAT_PATH).unwrap().as_str(), "http://example.com/dash/chatbot");
        assert_eq!(
            b.endpoint(SNAPSHOTS_PATH).unwrap().as_str(),
            "http://example.com/dash/processes-snapshots"
        );
    }

    #[test]
    fn missing_ca_file_is_reported() {
        let err = HttpBackend::new(
            Url::parse("https://example.com").unwrap(),
            Duration::from_secs(1),
            Some(Path::new("/nonexistent/ca.pem")),
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Tls { .. }));
    }
}
