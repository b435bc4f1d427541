//! Terminal dashboard for a system-monitoring backend.
//!
//! Four views (metrics chart, logs, process snapshot, chat) fetch from the
//! backend's REST endpoints and refetch when its Socket.IO channel says new
//! data is available.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod history;
pub mod http;
pub mod logging;
pub mod push;
pub mod types;
pub mod ui;
pub mod views;
