// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A worker entry has an empty ID
    EmptyWorkerId {
        /// Position of the entry in the `workers` list
        index: usize,
    },
    /// Two manifest entries share an ID
    DuplicateWorkerId {
        /// The duplicate worker ID
        worker_id: String,
    },
    /// The limiter would admit nothing
    ZeroConcurrency,
    /// Cached results would expire on arrival
    ZeroCacheTtl,
    /// Cached results would outlive any sensible deployment
    CacheTtlTooLong {
        /// Configured TTL
        seconds: u64,
        /// Upper bound
        max_seconds: u64,
    },
    /// A deadline of zero fails every call that yields even once
    ZeroTimeout {
        /// Which setting is zero
        setting: &'static str,
    },
    /// The in-process cache would hold nothing
    ZeroL1Capacity,
    /// A telemetry buffer or channel has no room
    ZeroTelemetryCapacity {
        /// Which setting is zero
        setting: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyWorkerId { index } => {
                write!(f, "Worker entry #{} has an empty id", index)
            }
            ValidationError::DuplicateWorkerId { worker_id } => {
                write!(f, "Duplicate worker ID: '{}'", worker_id)
            }
            ValidationError::ZeroConcurrency => {
                write!(f, "gateway.max_concurrency must be at least 1")
            }
            ValidationError::ZeroCacheTtl => {
                write!(f, "gateway.cache_ttl_seconds must be at least 1")
            }
            ValidationError::CacheTtlTooLong {
                seconds,
                max_seconds,
            } => write!(
                f,
                "gateway.cache_ttl_seconds is {}, must be at most {}",
                seconds, max_seconds
            ),
            ValidationError::ZeroTimeout { setting } => {
                write!(f, "gateway.{} must be at least 1", setting)
            }
            ValidationError::ZeroL1Capacity => {
                write!(f, "gateway.l1_max_entries must be at least 1")
            }
            ValidationError::ZeroTelemetryCapacity { setting } => {
                write!(f, "telemetry.{} must be at least 1", setting)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading the gateway configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
