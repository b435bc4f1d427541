//! Error types for backend fetches and the push socket.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    #[error("cannot load CA certificate {path}: {reason}")]
    Tls { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("cannot derive push url from {0}")]
    Url(String),

    #[error("tls setup failed: {0}")]
    Tls(#[from] rustls::Error),

    #[error("no frame from the server for {0:?}")]
    Silent(std::time::Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
