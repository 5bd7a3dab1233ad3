// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Schema-less worker input. Only the fingerprinting code looks inside it.
pub type Payload = Map<String, Value>;

/// A caller's request for a named worker to process a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub worker_id: String,
    pub payload: Payload,
}

impl InvocationRequest {
    pub fn new(worker_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            worker_id: worker_id.into(),
            payload,
        }
    }
}

/// What a worker hands back on success.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkerOutput {
    pub response: Value,
    pub metadata: Map<String, Value>,
}

impl WorkerOutput {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Classification of every failure a caller can observe.
///
/// Only `WorkerError` originates inside a worker; every other kind is produced by
/// the gateway itself and is deterministic for a given gateway state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The admission gate is halted.
    SystemHalted,
    /// The worker ID is not in the manifest. A client error, never retried.
    WorkerNotFound,
    /// The worker reported a failure (or panicked). Message passed through verbatim.
    WorkerError,
    /// The worker call exceeded its deadline and its limiter slot was released.
    Timeout,
    /// The caller cancelled before the result arrived.
    Cancelled,
    /// Gateway bookkeeping failed, e.g. the task driving the call vanished.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SystemHalted => "system_halted",
            ErrorKind::WorkerNotFound => "worker_not_found",
            ErrorKind::WorkerError => "worker_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Outcome of one invocation. Immutable once produced.
///
/// Serializable so the shared cache tier can store it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InvocationResult {
    Success {
        response: Value,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
}

impl InvocationResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        InvocationResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    /// The failure kind, or `None` for a success.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            InvocationResult::Success { .. } => None,
            InvocationResult::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn response(&self) -> Option<&Value> {
        match self {
            InvocationResult::Success { response, .. } => Some(response),
            InvocationResult::Failure { .. } => None,
        }
    }
}

impl From<WorkerOutput> for InvocationResult {
    fn from(output: WorkerOutput) -> Self {
        InvocationResult::Success {
            response: output.response,
            metadata: output.metadata,
        }
    }
}

/// Wire shape of an invocation result as returned by `POST /invoke/{workerID}`.
///
/// ```
/// use the_gateway::model::{ErrorKind, InvocationResponse, InvocationResult};
///
/// let result = InvocationResult::failure(ErrorKind::SystemHalted, "maintenance");
/// let body = serde_json::to_value(InvocationResponse::from(&result)).unwrap();
///
/// assert_eq!(body["status"], "error");
/// assert_eq!(body["error"], "maintenance");
/// assert_eq!(body["error_kind"], "system_halted");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl From<&InvocationResult> for InvocationResponse {
    fn from(result: &InvocationResult) -> Self {
        match result {
            InvocationResult::Success { response, metadata } => InvocationResponse {
                status: ResponseStatus::Success,
                response: Some(response.clone()),
                metadata: Some(metadata.clone()),
                error: None,
                error_kind: None,
            },
            InvocationResult::Failure { kind, message } => InvocationResponse {
                status: ResponseStatus::Error,
                response: None,
                metadata: None,
                error: Some(message.clone()),
                error_kind: Some(*kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_response_carries_payload_and_metadata() {
        let output = WorkerOutput::new(json!({"y": 2})).with_metadata("model", json!("small"));
        let result = InvocationResult::from(output);

        let body = serde_json::to_value(InvocationResponse::from(&result)).unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["response"], json!({"y": 2}));
        assert_eq!(body["metadata"]["model"], "small");
        assert!(body.get("error").is_none());
    }

    #[test]
    fn result_survives_the_shared_tier_encoding() {
        let result = InvocationResult::failure(ErrorKind::WorkerError, "boom");
        let encoded = serde_json::to_string(&result).unwrap();

        assert!(encoded.contains("\"outcome\":\"failure\""));
        let decoded: InvocationResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, result);
        assert_eq!(decoded.error_kind(), Some(ErrorKind::WorkerError));
    }

    #[test]
    fn error_kind_display_matches_wire_names() {
        let cases = vec![
            (ErrorKind::SystemHalted, "system_halted"),
            (ErrorKind::WorkerNotFound, "worker_not_found"),
            (ErrorKind::WorkerError, "worker_error"),
            (ErrorKind::Timeout, "timeout"),
            (ErrorKind::Cancelled, "cancelled"),
            (ErrorKind::Internal, "internal"),
        ];

        for (kind, expected) in cases {
            assert_eq!(kind.to_string(), expected);
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(expected));
        }
    }
}
