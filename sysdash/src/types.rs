//! Types that mirror the backend's JSON schema.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An instant as sent by the backend. Keeps the original text so log lines
/// can echo it verbatim while charts format the parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub instant: DateTime<Utc>,
    pub raw: String,
}

impl Timestamp {
    /// Epoch milliseconds, as a JSON number would carry them.
    pub fn from_millis(ms: f64) -> Option<Self> {
        if !ms.is_finite() {
            return None;
        }
        let instant = DateTime::from_timestamp_millis(ms.trunc() as i64)?;
        Some(Self {
            instant,
            raw: ms.to_string(),
        })
    }

    /// Accepts RFC 3339, RFC 2822 (Flask's `jsonify` default) and naive
    /// ISO-8601 date-times, the latter taken as UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let instant = DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|naive| naive.and_utc())
            })?;
        Some(Self {
            instant,
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = match &value {
            serde_json::Value::String(raw) => Timestamp::parse(raw),
            serde_json::Value::Number(n) => n.as_f64().and_then(Timestamp::from_millis),
            _ => None,
        };
        parsed.ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {value}")))
    }
}

/// Any JSON scalar as the text a log line should show: strings verbatim,
/// everything else in its JSON form.
fn raw_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricSample {
    pub timestamp: Timestamp,
    pub cpu_usage: f64,
    pub memory_usage: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogEntry {
    /// Shown as sent; log sources use too many stamp formats to parse.
    #[serde(deserialize_with = "raw_text")]
    pub timestamp: String,
    pub hostname: String,
    pub process: String,
    pub pid: u32,
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcessSnapshot {
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatReply {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_backend_timestamp_flavours() {
        let want = Utc.with_ymd_and_hms(2026, 10, 19, 14, 3, 5).unwrap();
        for raw in [
            "2026-10-19T14:03:05Z",
            "2026-10-19T16:03:05+02:00",
            "Mon, 19 Oct 2026 14:03:05 GMT",
            "2026-10-19T14:03:05",
            "2026-10-19 14:03:05.000",
        ] {
            let ts = Timestamp::parse(raw).unwrap_or_else(|| panic!("failed to parse {raw}"));
            assert_eq!(ts.instant, want, "{raw}");
            assert_eq!(ts.to_string(), raw);
        }
        assert!(Timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn snapshot_tolerates_missing_status_and_extra_fields() {
        let json = r#"[{"_id":"x","processes":[
            {"pid":1,"name":"init","cpu_usage":0.5,"memory_usage":1,"user":"root"},
            {"pid":42,"name":"sshd","status":"sleeping","cpu_usage":0,"memory_usage":0.25}
        ]}]"#;
        let snaps: Vec<ProcessSnapshot> = serde_json::from_str(json).unwrap();
        assert_eq!(snaps.len(), 1);
        assert!(snaps[0].timestamp.is_none());
        assert_eq!(snaps[0].processes[0].status, None);
        assert_eq!(snaps[0].processes[1].status.as_deref(), Some("sleeping"));
    }

    #[test]
    fn numeric_timestamps_are_epoch_millis() {
        let json = r#"{"timestamp":1760882585000,"cpu_usage":1,"memory_usage":2}"#;
        let sample: MetricSample = serde_json::from_str(json).unwrap();
        assert_eq!(
            sample.timestamp.instant,
            Utc.with_ymd_and_hms(2025, 10, 19, 14, 3, 5).unwrap()
        );
        assert_eq!(sample.timestamp.to_string(), "1760882585000");
    }

    #[test]
    fn log_timestamps_are_kept_verbatim() {
        let json = r#"[
            {"timestamp":"Oct 19 14:03:05","hostname":"box","process":"cron","pid":9,"message":"tick"},
            {"timestamp":1760882585000,"hostname":"box","process":"cron","pid":9,"message":"tock"}
        ]"#;
        let logs: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(logs[0].timestamp, "Oct 19 14:03:05");
        assert_eq!(logs[1].timestamp, "1760882585000");
    }

    #[test]
    fn bad_timestamp_is_a_decode_error() {
        let json = r#"{"timestamp":"soon","cpu_usage":1,"memory_usage":2}"#;
        let err = serde_json::from_str::<MetricSample>(json).unwrap_err();
        assert!(err.to_string().contains("unrecognised timestamp"));
    }
}
