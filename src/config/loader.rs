// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_CHANNEL_CAPACITY, DEFAULT_L1_MAX_ENTRIES,
    DEFAULT_L2_TIMEOUT_MS, DEFAULT_MAX_CONCURRENCY, DEFAULT_RING_BUFFER_SIZE,
    DEFAULT_WORKER_TIMEOUT_SECONDS,
};
use crate::errors::ConfigError;
use crate::model::WorkerDefinition;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the invocation gateway.
///
/// Loaded once at startup. The `workers` list is the static manifest; every other
/// section is optional and falls back to the defaults in [`crate::config::consts`].
///
/// # Example
/// ```yaml
/// gateway:
///   max_concurrency: 10
///   cache_ttl_seconds: 300
///   worker_timeout_seconds: 120
/// cache:
///   l2: memory
/// telemetry:
///   ring_buffer_size: 1000
/// workers:
///   - id: "w1"
///     group: 1
///     role: "echo"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayOptions,
    #[serde(default)]
    pub cache: CacheOptions,
    #[serde(default)]
    pub telemetry: TelemetryOptions,
    pub workers: Vec<WorkerDefinition>,
}

/// Orchestrator, limiter and cache lifetime options.
///
/// # Fields
/// * `max_concurrency` - Limiter capacity N
/// * `cache_ttl_seconds` - Default TTL applied to cached successes in both tiers
/// * `worker_timeout_seconds` - Deadline for a single worker call
/// * `l2_timeout_ms` - Deadline for a single shared-tier operation
/// * `l1_max_entries` - Bound on in-process cache entries
/// * `single_flight` - Coalesce concurrent identical requests into one call
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayOptions {
    pub max_concurrency: usize,
    pub cache_ttl_seconds: u64,
    pub worker_timeout_seconds: u64,
    pub l2_timeout_ms: u64,
    pub l1_max_entries: usize,
    pub single_flight: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            worker_timeout_seconds: DEFAULT_WORKER_TIMEOUT_SECONDS,
            l2_timeout_ms: DEFAULT_L2_TIMEOUT_MS,
            l1_max_entries: DEFAULT_L1_MAX_ENTRIES,
            single_flight: true,
        }
    }
}

impl GatewayOptions {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_seconds)
    }

    pub fn l2_timeout(&self) -> Duration {
        Duration::from_millis(self.l2_timeout_ms)
    }
}

/// Which shared store backs the second cache tier.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum L2Backend {
    /// In-process stand-in for a shared store
    Memory,
    /// L1 only
    #[default]
    None,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CacheOptions {
    pub l2: L2Backend,
}

/// Telemetry bus sizing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetryOptions {
    pub ring_buffer_size: usize,
    pub channel_capacity: usize,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            ring_buffer_size: DEFAULT_RING_BUFFER_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Load a config from a YAML file, or TOML when the extension is `.toml`
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let cfg = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Load and validate a config file
///
/// All validation problems are reported together.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let yaml = r#"
workers:
  - id: w1
    role: echo
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway, GatewayOptions::default());
        assert_eq!(cfg.gateway.max_concurrency, 10);
        assert_eq!(cfg.gateway.cache_ttl(), Duration::from_secs(300));
        assert!(cfg.gateway.single_flight);
        assert_eq!(cfg.cache.l2, L2Backend::None);
        assert_eq!(cfg.telemetry.ring_buffer_size, 1000);
        assert_eq!(cfg.workers[0].group, 0);
    }

    #[test]
    fn parse_full_yaml_config() {
        let yaml = r#"
gateway:
  max_concurrency: 3
  cache_ttl_seconds: 60
  worker_timeout_seconds: 5
  l2_timeout_ms: 100
  l1_max_entries: 50
  single_flight: false
cache:
  l2: memory
telemetry:
  ring_buffer_size: 10
  channel_capacity: 16
workers:
  - id: w1
    group: 1
    role: echo
  - id: w2
    group: 2
    role: word_count
"#;

        let file = write_temp(".yaml", yaml);
        let cfg = load_and_validate_config(file.path()).unwrap();

        assert_eq!(cfg.gateway.max_concurrency, 3);
        assert_eq!(cfg.gateway.worker_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.gateway.l2_timeout(), Duration::from_millis(100));
        assert_eq!(cfg.gateway.l1_max_entries, 50);
        assert!(!cfg.gateway.single_flight);
        assert_eq!(cfg.cache.l2, L2Backend::Memory);
        assert_eq!(cfg.telemetry.channel_capacity, 16);
        assert_eq!(cfg.workers.len(), 2);
        assert_eq!(cfg.workers[1], WorkerDefinition::new("w2", 2, "word_count"));
    }

    #[test]
    fn toml_extension_selects_toml_parser() {
        let toml = r#"
[gateway]
max_concurrency = 4

[cache]
l2 = "memory"

[[workers]]
id = "w1"
group = 7
role = "uppercase"
"#;

        let file = write_temp(".toml", toml);
        let cfg = load_and_validate_config(file.path()).unwrap();

        assert_eq!(cfg.gateway.max_concurrency, 4);
        assert_eq!(cfg.gateway.cache_ttl_seconds, 300);
        assert_eq!(cfg.cache.l2, L2Backend::Memory);
        assert_eq!(cfg.workers[0].group, 7);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn invalid_config_reports_every_problem() {
        let yaml = r#"
gateway:
  max_concurrency: 0
workers:
  - id: w1
    role: echo
  - id: w1
    role: echo
"#;

        let file = write_temp(".yaml", yaml);
        let err = load_and_validate_config(file.path()).unwrap_err();
        let msg = err.to_string();

        assert!(msg.starts_with("Configuration validation failed"));
        assert!(msg.contains("Duplicate worker ID: 'w1'"));
        assert!(msg.contains("max_concurrency must be at least 1"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let file = write_temp(".yaml", "workers: [ {id: ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
