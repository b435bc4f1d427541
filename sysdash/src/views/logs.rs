//! Logs list model.

use crate::types::LogEntry;

pub fn format_log_line(log: &LogEntry) -> String {
    format!(
        "{} {} {}[{}]: {}",
        log.timestamp, log.hostname, log.process, log.pid, log.message
    )
}

#[derive(Debug, Clone, Default)]
pub struct LogList {
    pub items: Vec<String>,
    pub revision: u64,
}

impl LogList {
    pub fn replace(&mut self, logs: &[LogEntry]) {
        self.items = logs.iter().map(format_log_line).collect();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(raw_ts: &str, pid: u32, message: &str) -> LogEntry {
        LogEntry {
            timestamp: raw_ts.into(),
            hostname: "box".into(),
            process: "sshd".into(),
            pid,
            message: message.into(),
        }
    }

    #[test]
    fn lines_follow_syslog_shape() {
        let mut list = LogList::default();
        list.replace(&[
            entry("Mon, 19 Oct 2026 14:03:05 GMT", 812, "Accepted publickey for root"),
            entry("2026-10-19T14:03:06Z", 813, "session opened"),
        ]);
        assert_eq!(list.items.len(), 2);
        assert_eq!(
            list.items[0],
            "Mon, 19 Oct 2026 14:03:05 GMT box sshd[812]: Accepted publickey for root"
        );
        assert_eq!(list.items[1], "2026-10-19T14:03:06Z box sshd[813]: session opened");
    }

    #[test]
    fn unparseable_stamps_are_echoed() {
        let mut list = LogList::default();
        list.replace(&[entry("Oct 19 14:03:05", 4, "boot")]);
        assert_eq!(list.items, ["Oct 19 14:03:05 box sshd[4]: boot"]);
    }

    #[test]
    fn replace_is_total() {
        let mut list = LogList::default();
        list.replace(&[entry("2026-10-19T14:03:06Z", 1, "a"), entry("2026-10-19T14:03:06Z", 2, "b")]);
        list.replace(&[entry("2026-10-19T14:03:07Z", 3, "c")]);
        assert_eq!(list.items, ["2026-10-19T14:03:07Z box sshd[3]: c"]);
        list.replace(&[]);
        assert!(list.items.is_empty());
        assert_eq!(list.revision, 3);
    }
}
