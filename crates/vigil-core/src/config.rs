//! Configuration types for vigil

use serde::{Deserialize, Serialize};

use crate::{EndpointSpec, VigilError, VigilResult};

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// API server configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Monitor configuration
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            monitor: MonitorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> VigilResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VigilError::Config(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| VigilError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind the API server
    pub address: String,
    /// Port for the API server
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 9090,
        }
    }
}

/// Monitor configuration as read from file.
///
/// Threshold values are carried as text and parsed by [`MonitorConfig::resolve`];
/// an unparsable value is a configuration error, never a silent default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sliding failure window in seconds
    pub failed_duration_secs: String,
    /// Windowed failure count above which a single endpoint alerts
    pub failed_url_threshold_count: String,
    /// Fleet-wide unhealthy percentage tolerance
    pub unhealthy_status_threshold_percentage: String,
    /// Global latency threshold fallback in milliseconds (0 disables)
    pub response_timeout_threshold_ms: String,
    /// Bound on one whole probing cycle in seconds (0 disables)
    pub cycle_timeout_secs: String,
    /// Per-probe request timeout in seconds
    pub probe_timeout_secs: String,
    /// Endpoints to probe, in order
    #[serde(default)]
    pub endpoints: Vec<EndpointEntry>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            failed_duration_secs: "30".to_string(),
            failed_url_threshold_count: "2".to_string(),
            unhealthy_status_threshold_percentage: "50".to_string(),
            response_timeout_threshold_ms: "0".to_string(),
            cycle_timeout_secs: "0".to_string(),
            probe_timeout_secs: "10".to_string(),
            endpoints: Vec::new(),
        }
    }
}

/// One endpoint entry as read from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointEntry {
    /// URL to probe
    pub url: String,
    /// Latency threshold in milliseconds; falls back to the global value
    pub response_timeout_threshold_ms: Option<String>,
}

/// Fully parsed monitor settings consumed by the orchestrator.
///
/// Resolved once, so every cycle sees one consistent set of thresholds.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Sliding failure window in seconds
    pub failed_duration_secs: u64,
    /// Windowed failure count above which a single endpoint alerts
    pub failed_url_threshold_count: u32,
    /// Fleet-wide unhealthy percentage tolerance
    pub unhealthy_status_threshold_percentage: u32,
    /// Bound on one whole probing cycle in seconds (0 disables)
    pub cycle_timeout_secs: u64,
    /// Per-probe request timeout in seconds
    pub probe_timeout_secs: u64,
    /// Endpoints to probe, latency thresholds already resolved
    pub endpoints: Vec<EndpointSpec>,
}

impl MonitorConfig {
    /// Parse every threshold and resolve per-endpoint latency thresholds.
    ///
    /// Rejects an empty endpoint list: an aggregate verdict over zero
    /// endpoints would divide by zero and must not report a silent 0%.
    pub fn resolve(&self) -> VigilResult<MonitorSettings> {
        let failed_duration_secs = parse_field("failed_duration_secs", &self.failed_duration_secs)?;
        let failed_url_threshold_count =
            parse_field("failed_url_threshold_count", &self.failed_url_threshold_count)?;
        let unhealthy_status_threshold_percentage = parse_field(
            "unhealthy_status_threshold_percentage",
            &self.unhealthy_status_threshold_percentage,
        )?;
        let response_timeout_threshold_ms: u64 = parse_field(
            "response_timeout_threshold_ms",
            &self.response_timeout_threshold_ms,
        )?;
        let cycle_timeout_secs = parse_field("cycle_timeout_secs", &self.cycle_timeout_secs)?;
        let probe_timeout_secs = parse_field("probe_timeout_secs", &self.probe_timeout_secs)?;

        if self.endpoints.is_empty() {
            return Err(VigilError::Config(
                "at least one endpoint must be configured".to_string(),
            ));
        }

        let endpoints = self
            .endpoints
            .iter()
            .map(|entry| {
                let threshold_ms = match &entry.response_timeout_threshold_ms {
                    Some(raw) => parse_field("endpoints.response_timeout_threshold_ms", raw)?,
                    None => response_timeout_threshold_ms,
                };
                Ok(EndpointSpec::new(entry.url.clone(), threshold_ms))
            })
            .collect::<VigilResult<Vec<_>>>()?;

        Ok(MonitorSettings {
            failed_duration_secs,
            failed_url_threshold_count,
            unhealthy_status_threshold_percentage,
            cycle_timeout_secs,
            probe_timeout_secs,
            endpoints,
        })
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, raw: &str) -> VigilResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| VigilError::Config(format!("invalid integer for '{}': '{}'", key, raw)))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or text)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_daemon_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.monitor.failed_duration_secs, "30");
    }

    #[test]
    fn test_monitor_config_parse() {
        let toml_str = r#"
[api]
address = "127.0.0.1"
port = 8088

[monitor]
failed_duration_secs = "60"
failed_url_threshold_count = "2"
unhealthy_status_threshold_percentage = "25"
response_timeout_threshold_ms = "500"
cycle_timeout_secs = "30"
probe_timeout_secs = "5"

[[monitor.endpoints]]
url = "http://localhost:8080/health"
response_timeout_threshold_ms = "200"

[[monitor.endpoints]]
url = "http://localhost:8081/health"
"#;
        let config: DaemonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.port, 8088);

        let settings = config.monitor.resolve().unwrap();
        assert_eq!(settings.failed_duration_secs, 60);
        assert_eq!(settings.unhealthy_status_threshold_percentage, 25);
        assert_eq!(settings.endpoints.len(), 2);
        // Per-endpoint threshold wins; the second endpoint falls back to the global.
        assert_eq!(settings.endpoints[0].response_timeout_threshold_ms, 200);
        assert_eq!(settings.endpoints[1].response_timeout_threshold_ms, 500);
    }

    #[test]
    fn test_unparsable_threshold_is_config_error() {
        let mut config = MonitorConfig::default();
        config.endpoints.push(EndpointEntry {
            url: "http://localhost:8080/health".to_string(),
            response_timeout_threshold_ms: None,
        });
        config.failed_url_threshold_count = "two".to_string();

        let err = config.resolve().unwrap_err();
        assert!(matches!(err, VigilError::Config(_)));
        assert!(err.to_string().contains("failed_url_threshold_count"));
    }

    #[test]
    fn test_empty_endpoint_list_is_config_error() {
        let config = MonitorConfig::default();
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, VigilError::Config(_)));
    }

    #[test]
    fn test_threshold_text_is_trimmed() {
        let mut config = MonitorConfig::default();
        config.failed_duration_secs = " 45 ".to_string();
        config.endpoints.push(EndpointEntry {
            url: "http://localhost:8080/health".to_string(),
            response_timeout_threshold_ms: None,
        });

        let settings = config.resolve().unwrap();
        assert_eq!(settings.failed_duration_secs, 45);
    }
}
