// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Role implementations for the in-process worker.
//!
//! Each role is a pure function of the payload, so identical payloads always
//! produce identical output, which is what makes them safe to cache.

use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::WorkerError;
use crate::model::{Payload, WorkerOutput};

pub const ECHO: &str = "echo";
pub const UPPERCASE: &str = "uppercase";
pub const WORD_COUNT: &str = "word_count";

/// Field the text roles read from the payload.
pub const TEXT_FIELD: &str = "text";

pub fn list_available_roles() -> Vec<&'static str> {
    vec![ECHO, UPPERCASE, WORD_COUNT]
}

pub fn is_role_available(role: &str) -> bool {
    list_available_roles().contains(&role)
}

/// Run `role` against `payload`.
pub fn run(role: &str, payload: &Payload) -> Result<WorkerOutput, WorkerError> {
    match role {
        ECHO => Ok(echo(payload)),
        UPPERCASE => uppercase(payload),
        WORD_COUNT => word_count(payload),
        other => Err(WorkerError::new(format!(
            "Unknown role '{}' (available: {})",
            other,
            list_available_roles().join(", ")
        ))),
    }
}

fn echo(payload: &Payload) -> WorkerOutput {
    WorkerOutput::new(Value::Object(payload.clone()))
}

fn uppercase(payload: &Payload) -> Result<WorkerOutput, WorkerError> {
    let text = text_field(payload)?;
    Ok(WorkerOutput::new(json!({ "text": text.to_uppercase() }))
        .with_metadata("transform_type", json!("uppercase")))
}

#[derive(Serialize)]
struct WordCount {
    char_count: usize,
    word_count: usize,
    line_count: usize,
}

fn word_count(payload: &Payload) -> Result<WorkerOutput, WorkerError> {
    let text = text_field(payload)?;
    let counts = WordCount {
        char_count: text.chars().count(),
        word_count: text.split_whitespace().count(),
        // An empty string is still one line.
        line_count: text.lines().count().max(1),
    };

    let response = serde_json::to_value(&counts)
        .map_err(|e| WorkerError::new(format!("Failed to serialize counts: {}", e)))?;
    Ok(WorkerOutput::new(response).with_metadata("analysis_type", json!("word_count")))
}

fn text_field(payload: &Payload) -> Result<&str, WorkerError> {
    payload
        .get(TEXT_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            WorkerError::new(format!("Payload field '{}' must be a string", TEXT_FIELD))
        })
}
