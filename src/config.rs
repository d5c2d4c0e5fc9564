use std::env;

use crate::error::ObservabilityError;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base path/name for the rotating log files; `{prefix}_{index}.log`.
    pub log_file_prefix: String,
    /// Rotation threshold, entries per file.
    pub max_entries_per_file: usize,
    /// Path prefixes excluded from capture (literal prefix match).
    pub ignore_paths: Vec<String>,
    /// Directory holding snapshot artifacts.
    pub snapshot_dir: String,
    /// Cap on log entries embedded in a snapshot.
    pub export_log_limit: usize,
    /// Default latency threshold for the slow-request queries (ms).
    pub slow_threshold_ms: u64,
    /// HTTP server port for the binary.
    pub http_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file_prefix: "logs/observability".to_string(),
            max_entries_per_file: 100,
            ignore_paths: vec![
                "/observability".to_string(),
                "/.well-known/appspecific".to_string(),
            ],
            snapshot_dir: "logs/snapshots".to_string(),
            export_log_limit: 1000,
            slow_threshold_ms: 500,
            http_port: 9600,
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ObservabilityError> {
        validate_prefix(&self.log_file_prefix)?;
        validate_max_entries(self.max_entries_per_file)?;
        validate_port(self.http_port)?;
        Ok(())
    }
}

/// Validates that the log file prefix is not empty or whitespace-only.
fn validate_prefix(prefix: &str) -> Result<(), ObservabilityError> {
    if prefix.trim().is_empty() {
        return Err(ObservabilityError::Config(
            "Log file prefix cannot be empty".into(),
        ));
    }
    Ok(())
}

/// Validates the rotation threshold (a zero cap would rotate on every write).
fn validate_max_entries(max_entries: usize) -> Result<(), ObservabilityError> {
    if max_entries == 0 {
        return Err(ObservabilityError::Config(
            "Max entries per file must be positive".into(),
        ));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), ObservabilityError> {
    if port == 0 {
        return Err(ObservabilityError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

pub fn get_configuration() -> Result<Settings, Box<dyn std::error::Error>> {
    let defaults = Settings::default();

    let log_file_prefix =
        env::var("OBS_LOG_FILE_PREFIX").unwrap_or(defaults.log_file_prefix);
    let max_entries_per_file = match env::var("OBS_MAX_ENTRIES_PER_FILE") {
        Ok(value) => value.parse::<usize>()?,
        Err(_) => defaults.max_entries_per_file,
    };
    let ignore_paths = match env::var("OBS_IGNORE_PATHS") {
        Ok(value) => value
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Err(_) => defaults.ignore_paths,
    };
    let snapshot_dir = env::var("OBS_SNAPSHOT_DIR").unwrap_or(defaults.snapshot_dir);
    let export_log_limit = match env::var("OBS_EXPORT_LOG_LIMIT") {
        Ok(value) => value.parse::<usize>()?,
        Err(_) => defaults.export_log_limit,
    };
    let slow_threshold_ms = match env::var("OBS_SLOW_THRESHOLD_MS") {
        Ok(value) => value.parse::<u64>()?,
        Err(_) => defaults.slow_threshold_ms,
    };
    let http_port = match env::var("HTTP_PORT") {
        Ok(value) => value.parse::<u16>()?,
        Err(_) => defaults.http_port,
    };

    let settings = Settings {
        log_file_prefix,
        max_entries_per_file,
        ignore_paths,
        snapshot_dir,
        export_log_limit,
        slow_threshold_ms,
        http_port,
    };

    // Validate settings before returning
    settings.validate()?;

    Ok(settings)
}
