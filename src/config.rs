//! Server configuration: defaults, `key = value` properties files, and
//! environment overrides.

use crate::error::{Result, SwiftQueueError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Server-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub shutdown_timeout: Duration,
    /// Initial capacity of each connection's read buffer.
    pub max_buffer_size: usize,
    /// Directory holding the metadata log segment.
    pub log_directory: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9092,
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
            max_buffer_size: 1024,
            log_directory: PathBuf::from("/tmp/kraft-combined-logs/__cluster_metadata-0"),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(SwiftQueueError::Config("invalid port: 0".into()));
        }
        if self.max_buffer_size == 0 {
            return Err(SwiftQueueError::Config("invalid max.buffer.size: 0".into()));
        }
        Ok(())
    }

    /// Load a properties file over the defaults.
    pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SwiftQueueError::Config(format!(
                "failed to open config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_properties(&text)
    }

    /// Parse `key = value` lines. Blank lines and `#` comments are skipped;
    /// unknown keys are ignored with a warning.
    pub fn from_properties(text: &str) -> Result<Self> {
        let mut config = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line_num = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                SwiftQueueError::Config(format!("invalid property at line {}: {}", line_num, line))
            })?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "host" => config.host = value.to_string(),
                "port" => config.port = parse_number(key, value, line_num)?,
                "max.buffer.size" => config.max_buffer_size = parse_number(key, value, line_num)?,
                "log.directory" => config.log_directory = PathBuf::from(value),
                _ => warn!(key, line = line_num, "unknown config property"),
            }
        }
        Ok(config)
    }

    /// Apply `SWIFTQUEUE_HOST`, `SWIFTQUEUE_PORT` and `SWIFTQUEUE_LOG_DIR` when set.
    pub fn apply_env(mut self) -> Self {
        if let Ok(host) = std::env::var("SWIFTQUEUE_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SWIFTQUEUE_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.port = port;
        }
        if let Ok(dir) = std::env::var("SWIFTQUEUE_LOG_DIR") {
            self.log_directory = PathBuf::from(dir);
        }
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str, line_num: usize) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        SwiftQueueError::Config(format!(
            "invalid {} value at line {}: {}",
            key, line_num, value
        ))
    })
}
