// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::model::{ErrorKind, InvocationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Busy,
    Success,
    Error,
}

/// Worker lifecycle notification. Published and forgotten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub worker_id: String,
    pub phase: Phase,
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(worker_id: impl Into<String>, phase: Phase, details: Value) -> Self {
        Self {
            worker_id: worker_id.into(),
            phase,
            details,
            timestamp: Utc::now(),
        }
    }

    pub fn busy(worker_id: &str) -> Self {
        Self::new(worker_id, Phase::Busy, Value::Null)
    }

    /// Success carries the full result; failures carry kind and message.
    pub fn from_result(worker_id: &str, result: &InvocationResult) -> Self {
        match result {
            InvocationResult::Success { response, metadata } => Self::new(
                worker_id,
                Phase::Success,
                json!({ "response": response, "metadata": metadata }),
            ),
            InvocationResult::Failure { kind, message } => Self::error(worker_id, *kind, message),
        }
    }

    pub fn error(worker_id: &str, kind: ErrorKind, message: &str) -> Self {
        Self::new(
            worker_id,
            Phase::Error,
            json!({ "kind": kind, "message": message }),
        )
    }
}

/// Topic the orchestrator publishes a worker's events on.
pub fn worker_topic(worker_id: &str) -> String {
    format!("worker.{}", worker_id)
}
