// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks run independently and every failure is collected, so an operator sees
//! all problems with a config file at once rather than one per restart:
//!
//! 1. **Manifest**: worker IDs are non-empty and unique
//! 2. **Gateway options**: the limiter admits at least one call, cached
//!    results live between a second and [`MAX_CACHE_TTL_SECONDS`], both
//!    deadlines are non-zero and L1 holds at least one entry
//! 3. **Telemetry options**: ring buffers and the dispatch channel have room
//!
//! # Example
//! ```rust
//! use the_gateway::config::{validate_config, Config, GatewayOptions, CacheOptions, TelemetryOptions};
//! use the_gateway::errors::ValidationError;
//! use the_gateway::model::WorkerDefinition;
//!
//! let config = Config {
//!     gateway: GatewayOptions { max_concurrency: 0, ..GatewayOptions::default() },
//!     cache: CacheOptions::default(),
//!     telemetry: TelemetryOptions::default(),
//!     workers: vec![WorkerDefinition::new("w1", 1, "echo")],
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors, vec![ValidationError::ZeroConcurrency]);
//! ```

use std::collections::HashSet;

use crate::config::consts::MAX_CACHE_TTL_SECONDS;
use crate::config::Config;
use crate::errors::ValidationError;

/// Validate a loaded configuration, returning every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_manifest(config, &mut errors);
    validate_gateway_options(config, &mut errors);
    validate_telemetry_options(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Worker IDs are the registry's primary key and the first half of every
/// fingerprint, so they must be present and unique.
fn validate_manifest(config: &Config, errors: &mut Vec<ValidationError>) {
    let mut seen_ids = HashSet::new();

    for (index, worker) in config.workers.iter().enumerate() {
        if worker.id.trim().is_empty() {
            errors.push(ValidationError::EmptyWorkerId { index });
            continue;
        }
        if !seen_ids.insert(worker.id.as_str()) {
            errors.push(ValidationError::DuplicateWorkerId {
                worker_id: worker.id.clone(),
            });
        }
    }
}

fn validate_gateway_options(config: &Config, errors: &mut Vec<ValidationError>) {
    let gateway = &config.gateway;
    if gateway.max_concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }
    if gateway.cache_ttl_seconds == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    } else if gateway.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
        errors.push(ValidationError::CacheTtlTooLong {
            seconds: gateway.cache_ttl_seconds,
            max_seconds: MAX_CACHE_TTL_SECONDS,
        });
    }
    if gateway.worker_timeout_seconds == 0 {
        errors.push(ValidationError::ZeroTimeout {
            setting: "worker_timeout_seconds",
        });
    }
    if gateway.l2_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout {
            setting: "l2_timeout_ms",
        });
    }
    if gateway.l1_max_entries == 0 {
        errors.push(ValidationError::ZeroL1Capacity);
    }
}

fn validate_telemetry_options(config: &Config, errors: &mut Vec<ValidationError>) {
    if config.telemetry.ring_buffer_size == 0 {
        errors.push(ValidationError::ZeroTelemetryCapacity {
            setting: "ring_buffer_size",
        });
    }
    if config.telemetry.channel_capacity == 0 {
        errors.push(ValidationError::ZeroTelemetryCapacity {
            setting: "channel_capacity",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheOptions, GatewayOptions, TelemetryOptions};
    use crate::model::WorkerDefinition;

    fn config_with(workers: Vec<WorkerDefinition>) -> Config {
        Config {
            gateway: GatewayOptions::default(),
            cache: CacheOptions::default(),
            telemetry: TelemetryOptions::default(),
            workers,
        }
    }

    #[test]
    fn test_validate_config_table_driven() {
        struct TestCase {
            name: &'static str,
            config: Config,
            expected: Result<(), Vec<ValidationError>>,
        }

        let test_cases = vec![
            TestCase {
                name: "valid manifest",
                config: config_with(vec![
                    WorkerDefinition::new("w1", 1, "echo"),
                    WorkerDefinition::new("w2", 1, "echo"),
                ]),
                expected: Ok(()),
            },
            TestCase {
                name: "empty manifest is allowed",
                config: config_with(vec![]),
                expected: Ok(()),
            },
            TestCase {
                name: "duplicate id",
                config: config_with(vec![
                    WorkerDefinition::new("w1", 1, "echo"),
                    WorkerDefinition::new("w1", 2, "uppercase"),
                ]),
                expected: Err(vec![ValidationError::DuplicateWorkerId {
                    worker_id: "w1".to_string(),
                }]),
            },
            TestCase {
                name: "blank id",
                config: config_with(vec![
                    WorkerDefinition::new("w1", 1, "echo"),
                    WorkerDefinition::new("  ", 1, "echo"),
                ]),
                expected: Err(vec![ValidationError::EmptyWorkerId { index: 1 }]),
            },
            TestCase {
                name: "zero ttl and zero telemetry capacity",
                config: Config {
                    gateway: GatewayOptions {
                        cache_ttl_seconds: 0,
                        ..GatewayOptions::default()
                    },
                    telemetry: TelemetryOptions {
                        ring_buffer_size: 0,
                        channel_capacity: 0,
                    },
                    ..config_with(vec![WorkerDefinition::new("w1", 1, "echo")])
                },
                expected: Err(vec![
                    ValidationError::ZeroCacheTtl,
                    ValidationError::ZeroTelemetryCapacity {
                        setting: "ring_buffer_size",
                    },
                    ValidationError::ZeroTelemetryCapacity {
                        setting: "channel_capacity",
                    },
                ]),
            },
            TestCase {
                name: "zero deadlines and zero l1 capacity",
                config: Config {
                    gateway: GatewayOptions {
                        worker_timeout_seconds: 0,
                        l2_timeout_ms: 0,
                        l1_max_entries: 0,
                        ..GatewayOptions::default()
                    },
                    ..config_with(vec![WorkerDefinition::new("w1", 1, "echo")])
                },
                expected: Err(vec![
                    ValidationError::ZeroTimeout {
                        setting: "worker_timeout_seconds",
                    },
                    ValidationError::ZeroTimeout {
                        setting: "l2_timeout_ms",
                    },
                    ValidationError::ZeroL1Capacity,
                ]),
            },
            TestCase {
                name: "ttl beyond the upper bound",
                config: Config {
                    gateway: GatewayOptions {
                        cache_ttl_seconds: u64::MAX,
                        ..GatewayOptions::default()
                    },
                    ..config_with(vec![WorkerDefinition::new("w1", 1, "echo")])
                },
                expected: Err(vec![ValidationError::CacheTtlTooLong {
                    seconds: u64::MAX,
                    max_seconds: MAX_CACHE_TTL_SECONDS,
                }]),
            },
            TestCase {
                name: "ttl at the upper bound",
                config: Config {
                    gateway: GatewayOptions {
                        cache_ttl_seconds: MAX_CACHE_TTL_SECONDS,
                        ..GatewayOptions::default()
                    },
                    ..config_with(vec![WorkerDefinition::new("w1", 1, "echo")])
                },
                expected: Ok(()),
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                validate_config(&test_case.config),
                test_case.expected,
                "Test case '{}'",
                test_case.name
            );
        }
    }
}
