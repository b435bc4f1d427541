//! Metrics chart model: two capped series (CPU, memory) keyed by a formatted timestamp.

use chrono::{DateTime, Local, Utc};

use crate::history::Series;
use crate::types::MetricSample;

pub const CPU_SERIES: &str = "CPU Usage %";
pub const MEMORY_SERIES: &str = "Memory Usage %";
const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which clock chart labels are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelZone {
    #[default]
    Local,
    Utc,
}

impl LabelZone {
    pub fn format(self, ts: &DateTime<Utc>) -> String {
        match self {
            LabelZone::Local => ts.with_timezone(&Local).format(LABEL_FORMAT).to_string(),
            LabelZone::Utc => ts.format(LABEL_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsChart {
    pub cpu: Series,
    pub memory: Series,
    pub revision: u64,
}

impl MetricsChart {
    pub fn new(cap: usize) -> Self {
        Self {
            cpu: Series::new(CPU_SERIES, cap),
            memory: Series::new(MEMORY_SERIES, cap),
            revision: 0,
        }
    }

    /// Replaces both series with `samples`, in input order.
    pub fn replace(&mut self, samples: &[MetricSample], zone: LabelZone) {
        self.cpu.clear();
        self.memory.clear();
        for s in samples {
            let label = zone.format(&s.timestamp.instant);
            self.cpu.push(label.clone(), s.cpu_usage);
            self.memory.push(label, s.memory_usage);
        }
        self.revision += 1;
    }
}
