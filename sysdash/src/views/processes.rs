//! Processes table model: rows of the latest snapshot only.

use crate::types::{ProcessInfo, ProcessSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    pub pid: String,
    pub name: String,
    pub status: String,
    pub cpu: String,
    pub memory: String,
}

impl From<&ProcessInfo> for ProcessRow {
    fn from(p: &ProcessInfo) -> Self {
        Self {
            pid: p.pid.to_string(),
            name: p.name.clone(),
            status: p.status.clone().unwrap_or_default(),
            cpu: format!("{}%", p.cpu_usage),
            memory: format!("{}%", p.memory_usage),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    pub rows: Vec<ProcessRow>,
    /// Backend timestamp of the snapshot on display, if it sent one.
    pub taken_at: Option<String>,
    pub revision: u64,
}

impl ProcessTable {
    /// Shows the first snapshot of `snapshots`; none at all means an empty table.
    pub fn replace(&mut self, snapshots: &[ProcessSnapshot]) {
        match snapshots.first() {
            Some(snap) => {
                self.rows = snap.processes.iter().map(ProcessRow::from).collect();
                self.taken_at = snap.timestamp.as_ref().map(|t| t.to_string());
            }
            None => {
                self.rows.clear();
                self.taken_at = None;
            }
        }
        self.revision += 1;
    }
}
