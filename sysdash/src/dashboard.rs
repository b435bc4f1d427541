//! Dashboard state and the fetch-and-render pipelines of every view.
//!
//! Fetches run as independent tokio tasks and post their results back over a
//! channel; only [`Dashboard::apply`] touches the view binding. Each view
//! tags its requests with a sequence number and ignores results older than
//! what it already shows, so a slow response can't overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::config::Limits;
use crate::error::FetchError;
use crate::events::{EventBus, RefreshSignal};
use crate::http::DashboardSource;
use crate::types::{LogEntry, MetricSample, ProcessSnapshot};
use crate::views::metrics::LabelZone;
use crate::views::ViewBinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Metrics,
    Logs,
    Processes,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Metrics, ViewKind::Logs, ViewKind::Processes];

    fn name(self) -> &'static str {
        match self {
            ViewKind::Metrics => "metrics",
            ViewKind::Logs => "logs",
            ViewKind::Processes => "processes",
        }
    }
}

impl From<RefreshSignal> for ViewKind {
    fn from(s: RefreshSignal) -> Self {
        match s {
            RefreshSignal::SystemMetrics => ViewKind::Metrics,
            RefreshSignal::Logs => ViewKind::Logs,
            RefreshSignal::ProcessesSnapshot => ViewKind::Processes,
        }
    }
}

#[derive(Debug)]
pub enum Update {
    Metrics {
        seq: u64,
        result: Result<Vec<MetricSample>, FetchError>,
    },
    Logs {
        seq: u64,
        result: Result<Vec<LogEntry>, FetchError>,
    },
    Processes {
        seq: u64,
        result: Result<Vec<ProcessSnapshot>, FetchError>,
    },
    Chat {
        prompt: String,
        result: Result<String, FetchError>,
    },
}

#[derive(Debug, Default)]
struct RequestSeq {
    issued: u64,
    applied: u64,
}

impl RequestSeq {
    fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn accept(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }
}

pub struct Dashboard<S> {
    source: Arc<S>,
    limits: Limits,
    zone: LabelZone,
    view: ViewBinding,
    metrics_seq: RequestSeq,
    logs_seq: RequestSeq,
    procs_seq: RequestSeq,
    triggers_tx: UnboundedSender<ViewKind>,
    triggers_rx: UnboundedReceiver<ViewKind>,
    updates_tx: UnboundedSender<Update>,
    updates_rx: UnboundedReceiver<Update>,
}

impl<S: DashboardSource> Dashboard<S> {
    pub fn new(source: S, limits: Limits, zone: LabelZone) -> Self {
        let (triggers_tx, triggers_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            view: ViewBinding::new(limits.metrics),
            limits,
            zone,
            metrics_seq: RequestSeq::default(),
            logs_seq: RequestSeq::default(),
            procs_seq: RequestSeq::default(),
            triggers_tx,
            triggers_rx,
            updates_tx,
            updates_rx,
        }
    }

    pub fn view(&self) -> &ViewBinding {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewBinding {
        &mut self.view
    }

    /// Registers one handler per refresh signal. Handlers only queue a
    /// trigger; the fetch starts on the next [`pump`](Self::pump).
    pub fn subscribe(&self, bus: &mut EventBus) {
        for signal in RefreshSignal::ALL {
            let tx = self.triggers_tx.clone();
            let kind = ViewKind::from(signal);
            bus.on(signal, move || {
                let _ = tx.send(kind);
            });
        }
    }

    /// Initial fetch of every data view.
    pub fn load(&mut self) {
        info!("loading all views");
        for kind in ViewKind::ALL {
            self.trigger(kind);
        }
    }

    pub fn trigger(&mut self, kind: ViewKind) {
        let source = Arc::clone(&self.source);
        let tx = self.updates_tx.clone();
        match kind {
            ViewKind::Metrics => {
                let seq = self.metrics_seq.next();
                let limit = self.limits.metrics;
                tokio::spawn(async move {
                    let result = source.metrics(limit).await;
                    let _ = tx.send(Update::Metrics { seq, result });
                });
            }
            ViewKind::Logs => {
                let seq = self.logs_seq.next();
                let limit = self.limits.logs;
                tokio::spawn(async move {
                    let result = source.logs(limit).await;
                    let _ = tx.send(Update::Logs { seq, result });
                });
            }
            ViewKind::Processes => {
                let seq = self.procs_seq.next();
                let limit = self.limits.snapshots;
                tokio::spawn(async move {
                    let result = source.process_snapshots(limit).await;
                    let _ = tx.send(Update::Processes { seq, result });
                });
            }
        }
        debug!(view = kind.name(), "fetch started");
    }

    /// Sends the prompt input to the chat endpoint.
    pub fn submit_prompt(&mut self) {
        let prompt = self.view.chat.prompt();
        let source = Arc::clone(&self.source);
        let tx = self.updates_tx.clone();
        debug!(len = prompt.len(), "chat prompt submitted");
        tokio::spawn(async move {
            let result = source.chat(prompt.clone()).await;
            let _ = tx.send(Update::Chat { prompt, result });
        });
    }

    fn start_pending(&mut self) {
        while let Ok(kind) = self.triggers_rx.try_recv() {
            self.trigger(kind);
        }
    }

    /// Starts queued triggers and applies every finished fetch. Returns how
    /// many results were rendered.
    pub fn pump(&mut self) -> usize {
        self.start_pending();
        let mut rendered = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            if self.apply(update) {
                rendered += 1;
            }
        }
        rendered
    }

    /// Starts queued triggers, then waits for one result and applies it.
    pub async fn next_update(&mut self) -> bool {
        self.start_pending();
        match self.updates_rx.recv().await {
            Some(update) => self.apply(update),
            None => false,
        }
    }

    /// Renders a fetch result into the view binding. Failed and stale results
    /// leave the view as it was; returns whether anything was rendered.
    pub fn apply(&mut self, update: Update) -> bool {
        match update {
            Update::Metrics { seq, result } => match result {
                Ok(samples) if self.metrics_seq.accept(seq) => {
                    self.view.chart.replace(&samples, self.zone);
                    true
                }
                Ok(_) => stale(ViewKind::Metrics, seq),
                Err(e) => failed(ViewKind::Metrics, &e),
            },
            Update::Logs { seq, result } => match result {
                Ok(logs) if self.logs_seq.accept(seq) => {
                    self.view.logs.replace(&logs);
                    true
                }
                Ok(_) => stale(ViewKind::Logs, seq),
                Err(e) => failed(ViewKind::Logs, &e),
            },
            Update::Processes { seq, result } => match result {
                Ok(snapshots) if self.procs_seq.accept(seq) => {
                    if snapshots.is_empty() {
                        debug!("no process snapshot available");
                    }
                    self.view.processes.replace(&snapshots);
                    true
                }
                Ok(_) => stale(ViewKind::Processes, seq),
                Err(e) => failed(ViewKind::Processes, &e),
            },
            Update::Chat { prompt, result } => match result {
                Ok(answer) => {
                    self.view.chat.append(prompt, answer);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "chat request failed");
                    self.view.chat.fail(e.to_string());
                    false
                }
            },
        }
    }
}

fn stale(kind: ViewKind, seq: u64) -> bool {
    debug!(view = kind.name(), seq, "dropping stale response");
    false
}

fn failed(kind: ViewKind, e: &FetchError) -> bool {
    warn!(view = kind.name(), error = %e, "fetch failed; keeping previous view");
    false
}
