use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One completed request observation, immutable once written.
///
/// Field names are camelCase on the wire and on disk. Records written
/// through the free-form `log` call may omit the request fields, which then
/// deserialize to their defaults, and may carry arbitrary extra fields.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEntry {
    /// Status in `[200, 400)`.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }

    /// Status `>= 400`. Statuses below 200 are neither success nor failure.
    pub fn is_failure(&self) -> bool {
        self.status_code >= 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_buckets() {
        let mut entry = LogEntry {
            timestamp: "2025-01-10T12:00:00.000Z".to_string(),
            method: "GET".to_string(),
            endpoint: "/".to_string(),
            status_code: 200,
            latency_ms: 10,
            error_message: None,
            extra: Map::new(),
        };
        assert!(entry.is_success());
        assert!(!entry.is_failure());

        entry.status_code = 399;
        assert!(entry.is_success());

        entry.status_code = 400;
        assert!(!entry.is_success());
        assert!(entry.is_failure());

        entry.status_code = 101;
        assert!(!entry.is_success());
        assert!(!entry.is_failure());
    }

    #[test]
    fn serializes_camel_case() {
        let entry = LogEntry {
            timestamp: "2025-01-10T12:00:00.000Z".to_string(),
            method: "GET".to_string(),
            endpoint: "/users".to_string(),
            status_code: 200,
            latency_ms: 42,
            error_message: None,
            extra: Map::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["latencyMs"], 42);
        assert!(value.get("errorMessage").is_none());
    }

    #[test]
    fn deserializes_free_form_record() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"timestamp":"2025-01-10T12:00:00.000Z","service":"worker","event":"tick"}"#,
        )
        .unwrap();
        assert_eq!(entry.status_code, 0);
        assert_eq!(entry.extra["service"], "worker");
        assert!(!entry.is_success());
        assert!(!entry.is_failure());
    }
}
