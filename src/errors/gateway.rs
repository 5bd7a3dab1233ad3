// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the gateway's own components.
//!
//! None of these reach a caller directly: the orchestrator folds them into an
//! [`InvocationResult`](crate::model::InvocationResult) failure kind, or logs and
//! absorbs them when they concern a non-essential collaborator.

use std::time::Duration;
use thiserror::Error;

/// The worker ID is absent from the static manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Worker '{0}' is not in the manifest")]
    NotFound(String),
}

/// Failure reported by the shared (L2) key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached. Distinct from a plain miss.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// A stored value could not be decoded into a result.
    #[error("Corrupt cache value: {0}")]
    Corrupt(String),
}

/// A worker's own failure. The message is surfaced to callers verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct WorkerError {
    pub message: String,
}

impl WorkerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for WorkerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for WorkerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Internal gateway faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Concurrency limiter is closed")]
    LimiterClosed,

    #[error("Invocation task for fingerprint {0} ended without a result")]
    LeaderVanished(String),
}
