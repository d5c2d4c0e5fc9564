use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::LogEntry;

/// Aggregate success/failure counts over the full log history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage, rounded to 2 decimal places. `0` when there are no entries.
    pub success_rate: f64,
    pub failure_rate: f64,
    pub timestamp: String,
}

/// Compute stats over a slice of entries (any order).
///
/// Successes are statuses in `[200, 400)`, failures `>= 400`; statuses below
/// 200 only increment the total.
pub fn compute_stats(entries: &[LogEntry]) -> Stats {
    let total = entries.len();
    let successes = entries.iter().filter(|e| e.is_success()).count();
    let failures = entries.iter().filter(|e| e.is_failure()).count();

    let (success_rate, failure_rate) = if total == 0 {
        (0.0, 0.0)
    } else {
        (percent(successes, total), percent(failures, total))
    };

    Stats {
        total,
        successes,
        failures,
        success_rate,
        failure_rate,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn percent(part: usize, total: usize) -> f64 {
    ((part as f64 / total as f64) * 10_000.0).round() / 100.0
}
