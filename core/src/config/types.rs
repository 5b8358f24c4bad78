use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "conductor_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request deadline in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Upper bound on in-flight provider calls per batch. `None` = unbounded fan-out.
    #[serde(default)]
    pub max_parallel: Option<usize>,

    /// Per-task deadline in milliseconds; 0 disables it.
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,
}

fn default_task_timeout_ms() -> u64 {
    120_000
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_parallel: None,
            task_timeout_ms: default_task_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Timeout applied by the HTTP client to each provider call.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Base URL overrides keyed by provider id ("openai", "google", ...).
    #[serde(default)]
    pub base_urls: BTreeMap<String, String>,
}

fn default_http_timeout_ms() -> u64 {
    110_000
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            http_timeout_ms: default_http_timeout_ms(),
            base_urls: BTreeMap::new(),
        }
    }
}

impl ProvidersConfig {
    pub fn base_url(&self, provider_id: &str) -> Option<&str> {
        self.base_urls
            .get(provider_id)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.http_server.port, 8080);
        assert_eq!(cfg.executor.task_timeout_ms, 120_000);
        assert!(cfg.executor.max_parallel.is_none());
        assert!(cfg.logging.console);
    }

    #[test]
    fn test_base_url_override() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [providers.base_urls]
            openai = "http://localhost:9000"
            luma = "  "
            "#,
        )
        .unwrap();
        assert_eq!(cfg.providers.base_url("openai"), Some("http://localhost:9000"));
        assert_eq!(cfg.providers.base_url("luma"), None);
    }
}
