// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the gateway. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the human-readable line and the structured event
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::gateway` - Admission, invocation lifecycle and worker call events
//! * `messages::cache` - Tiered cache hits, expiry and shared-tier degradation
//! * `messages::registry` - Worker handle lifecycle
//! * `messages::telemetry` - Telemetry bus delivery problems
//!
//! # Usage
//!
//! ```rust
//! use the_gateway::observability::messages::StructuredLog;
//! use the_gateway::observability::messages::gateway::WorkerNotFound;
//!
//! WorkerNotFound { worker_id: "ghost" }.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the process-wide `fmt` subscriber.
///
/// Honors `RUST_LOG`; falls back to `default_directive` (e.g. `"info"`). Calling it
/// twice is harmless: the second install is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
