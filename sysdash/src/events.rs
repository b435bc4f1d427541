//! Refresh signals and the subscription registry views hang off.
//!
//! The push socket only ever says "something changed"; it never carries data.
//! Views register a handler per signal and re-run their own fetch when it fires.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshSignal {
    SystemMetrics,
    Logs,
    ProcessesSnapshot,
}

impl RefreshSignal {
    pub const ALL: [RefreshSignal; 3] = [
        RefreshSignal::SystemMetrics,
        RefreshSignal::Logs,
        RefreshSignal::ProcessesSnapshot,
    ];

    pub fn event_name(self) -> &'static str {
        match self {
            RefreshSignal::SystemMetrics => "new_system_metrics",
            RefreshSignal::Logs => "new_logs",
            RefreshSignal::ProcessesSnapshot => "new_processes_snapshot",
        }
    }

    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.event_name() == name)
    }
}

impl fmt::Display for RefreshSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

pub type Handler = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<RefreshSignal, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, signal: RefreshSignal, handler: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.handlers.entry(signal).or_default().push(Box::new(handler));
    }

    /// Runs every handler registered for `signal`; returns how many ran.
    pub fn emit(&mut self, signal: RefreshSignal) -> usize {
        match self.handlers.get_mut(&signal) {
            Some(list) => {
                list.iter_mut().for_each(|h| h());
                list.len()
            }
            None => 0,
        }
    }

    /// Dispatch by wire event name. Unknown names are ignored.
    pub fn emit_named(&mut self, name: &str) -> usize {
        match RefreshSignal::from_event_name(name) {
            Some(signal) => self.emit(signal),
            None => {
                debug!(event = name, "ignoring unknown push event");
                0
            }
        }
    }

    pub fn handler_count(&self, signal: RefreshSignal) -> usize {
        self.handlers.get(&signal).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("EventBus");
        for s in RefreshSignal::ALL {
            d.field(s.event_name(), &self.handler_count(s));
        }
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn event_names_round_trip() {
        for s in RefreshSignal::ALL {
            assert_eq!(RefreshSignal::from_event_name(s.event_name()), Some(s));
        }
        assert_eq!(RefreshSignal::from_event_name("new_cats"), None);
    }

    #[test]
    fn emit_only_runs_matching_handlers() {
        let logs = Arc::new(AtomicUsize::new(0));
        let metrics = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        {
            let logs = logs.clone();
            bus.on(RefreshSignal::Logs, move || {
                logs.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let metrics = metrics.clone();
            bus.on(RefreshSignal::SystemMetrics, move || {
                metrics.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(bus.emit_named("new_logs"), 1);
        assert_eq!(bus.emit_named("bogus"), 0);
        assert_eq!(bus.emit(RefreshSignal::ProcessesSnapshot), 0);
        assert_eq!(logs.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.load(Ordering::SeqCst), 0);
    }
}
