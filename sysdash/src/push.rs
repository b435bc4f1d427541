//! Push channel: a Socket.IO (Engine.IO v4) client over a plain WebSocket.
//!
//! Only the handful of packets the dashboard needs are understood: the
//! handshake, heartbeats and event packets whose name maps to a
//! [`RefreshSignal`]. Event payloads are never read.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use serde::Deserialize;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{
    connect_async_tls_with_config, tungstenite::Message, Connector, MaybeTlsStream,
    WebSocketStream,
};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::PushError;
use crate::events::RefreshSignal;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// What the listener reports to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushEvent {
    Connected,
    Disconnected,
    Refresh(RefreshSignal),
}

const ENGINE_QUERY: &str = "EIO=4&transport=websocket";
const NAMESPACE_CONNECT: &str = "40";
const PONG: &str = "3";

/// Heartbeat timings from the open packet, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            ping_interval: default_ping_interval(),
            ping_timeout: default_ping_timeout(),
        }
    }
}

impl Heartbeat {
    /// Longest silence tolerated before the connection counts as dead.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Engine.IO handshake, server side.
    Open(Heartbeat),
    Close,
    Ping,
    Pong,
    /// Namespace connect acknowledged.
    Connected,
    Disconnected,
    ConnectError(String),
    Event(String),
    Other,
}

pub fn decode_frame(text: &str) -> Frame {
    let Some(kind) = text.chars().next() else {
        return Frame::Other;
    };
    let rest = &text[kind.len_utf8()..];
    match kind {
        '0' => Frame::Open(serde_json::from_str(rest).unwrap_or_default()),
        '1' => Frame::Close,
        '2' => Frame::Ping,
        '3' => Frame::Pong,
        '4' => decode_socket_packet(rest),
        _ => Frame::Other,
    }
}

fn decode_socket_packet(packet: &str) -> Frame {
    let Some(kind) = packet.chars().next() else {
        return Frame::Other;
    };
    let rest = &packet[kind.len_utf8()..];
    match kind {
        '0' => Frame::Connected,
        '1' => Frame::Disconnected,
        '2' => event_name(rest).map_or(Frame::Other, Frame::Event),
        '4' => Frame::ConnectError(rest.to_string()),
        _ => Frame::Other,
    }
}

// Body layout: [/namespace,][ack id]["name", ...payload]
fn event_name(body: &str) -> Option<String> {
    let mut rest = body;
    if rest.starts_with('/') {
        let comma = rest.find(',')?;
        rest = &rest[comma + 1..];
    }
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let value: serde_json::Value = serde_json::from_str(rest).ok()?;
    value.as_array()?.first()?.as_str().map(str::to_owned)
}

/// Engine.IO endpoint for a backend base url (http→ws, https→wss).
pub fn socket_url(base: &Url) -> Result<Url, PushError> {
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(PushError::Url(base.to_string())),
    };
    let mut url = base.clone();
    url.set_scheme(scheme)
        .map_err(|_| PushError::Url(base.to_string()))?;
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}/socket.io/"));
    url.set_query(Some(ENGINE_QUERY));
    url.set_fragment(None);
    Ok(url)
}

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub base: Url,
    pub tls_ca: Option<PathBuf>,
    pub auto_reconnect: bool,
    pub reconnect_delay: Duration,
    /// 0 = retry forever
    pub max_reconnect_attempts: u32,
}

impl PushConfig {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            tls_ca: None,
            auto_reconnect: true,
            reconnect_delay: Duration::from_secs(2),
            max_reconnect_attempts: 0,
        }
    }
}

fn tls_config(ca: &Path) -> Result<Arc<rustls::ClientConfig>, PushError> {
    let pem = std::fs::read(ca)?;
    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut pem.as_slice()) {
        roots.add(cert?)?;
    }
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Keeps the push socket alive and forwards its events to `tx` until the
/// receiver goes away (or reconnecting is disabled/exhausted).
///
/// Every namespace connect after the first one also sends all signals, since
/// notifications may have been missed while disconnected.
pub async fn listen(config: PushConfig, tx: UnboundedSender<PushEvent>) -> Result<(), PushError> {
    let url = socket_url(&config.base)?;
    let tls = config.tls_ca.as_deref().map(tls_config).transpose()?;
    let mut connected_before = false;
    let mut attempts = 0u32;

    loop {
        info!(url = %url, "connecting push socket");
        let connector = tls.clone().map(Connector::Rustls);
        match connect_async_tls_with_config(url.as_str(), None, false, connector).await {
            Ok((ws, _)) => {
                attempts = 0;
                match session(ws, &tx, &mut connected_before).await {
                    Ok(()) => info!("push socket closed"),
                    Err(e) => warn!(error = %e, "push socket error"),
                }
                let _ = tx.send(PushEvent::Disconnected);
            }
            Err(e) => error!(error = %e, "push socket connect failed"),
        }

        if tx.is_closed() || !config.auto_reconnect {
            return Ok(());
        }
        attempts += 1;
        if config.max_reconnect_attempts > 0 && attempts >= config.max_reconnect_attempts {
            warn!(attempts, "giving up on push socket");
            return Ok(());
        }
        info!(
            attempt = attempts,
            delay_ms = config.reconnect_delay.as_millis() as u64,
            "reconnecting push socket"
        );
        sleep(config.reconnect_delay).await;
    }
}

async fn session(
    ws: WsStream,
    tx: &UnboundedSender<PushEvent>,
    connected_before: &mut bool,
) -> Result<(), PushError> {
    let (mut write, mut read) = ws.split();
    let mut heartbeat = Heartbeat::default();
    loop {
        let deadline = heartbeat.deadline();
        let Some(msg) = timeout(deadline, read.next())
            .await
            .map_err(|_| PushError::Silent(deadline))?
        else {
            break;
        };
        let text = match msg? {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };
        match decode_frame(&text) {
            Frame::Open(hb) => {
                debug!(ping_interval = hb.ping_interval, ping_timeout = hb.ping_timeout, "engine open");
                heartbeat = hb;
                write.send(Message::Text(NAMESPACE_CONNECT.into())).await?;
            }
            Frame::Ping => write.send(Message::Text(PONG.into())).await?,
            Frame::Connected => {
                if tx.send(PushEvent::Connected).is_err() {
                    return Ok(());
                }
                if *connected_before {
                    for s in RefreshSignal::ALL {
                        if tx.send(PushEvent::Refresh(s)).is_err() {
                            return Ok(());
                        }
                    }
                }
                *connected_before = true;
                info!("push channel ready");
            }
            Frame::Event(name) => match RefreshSignal::from_event_name(&name) {
                Some(signal) => {
                    debug!(event = %signal, "refresh signal");
                    if tx.send(PushEvent::Refresh(signal)).is_err() {
                        return Ok(());
                    }
                }
                None => debug!(event = %name, "ignoring unknown push event"),
            },
            Frame::ConnectError(reason) => {
                warn!(%reason, "namespace connect refused");
                break;
            }
            Frame::Close | Frame::Disconnected => break,
            Frame::Pong | Frame::Other => {}
        }
    }
    Ok(())
}
