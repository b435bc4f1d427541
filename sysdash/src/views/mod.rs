//! Element models the dashboard renders into, one per view.
//!
//! These are what a browser would keep in the DOM: the terminal UI draws them
//! every frame and tests read them directly.

pub mod chat;
pub mod logs;
pub mod metrics;
pub mod processes;

use chat::ChatPanel;
use logs::LogList;
use metrics::MetricsChart;
use processes::ProcessTable;

#[derive(Debug, Clone)]
pub struct ViewBinding {
    pub chart: MetricsChart,
    pub logs: LogList,
    pub processes: ProcessTable,
    pub chat: ChatPanel,
}

impl ViewBinding {
    pub fn new(chart_cap: usize) -> Self {
        Self {
            chart: MetricsChart::new(chart_cap),
            logs: LogList::default(),
            processes: ProcessTable::default(),
            chat: ChatPanel::default(),
        }
    }
}
