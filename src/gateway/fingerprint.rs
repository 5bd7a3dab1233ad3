// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deterministic cache and single-flight key for an invocation.
//!
//! The digest covers the worker ID and a canonical serialization of the payload
//! in which object keys are sorted at every depth, so semantically identical
//! payloads produce the same fingerprint regardless of field order.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::model::Payload;

/// Hex-encoded SHA-256 of `(worker_id, canonical payload)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// ```
    /// use serde_json::json;
    /// use the_gateway::gateway::Fingerprint;
    ///
    /// let a = json!({"a": 1, "b": 2});
    /// let b = json!({"b": 2, "a": 1});
    ///
    /// assert_eq!(
    ///     Fingerprint::compute("w1", a.as_object().unwrap()),
    ///     Fingerprint::compute("w1", b.as_object().unwrap()),
    /// );
    /// ```
    pub fn compute(worker_id: &str, payload: &Payload) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(worker_id.as_bytes());
        // Separator keeps ("ab", {..}) and ("a", "b"..) from colliding.
        hasher.update([0u8]);
        hasher.update(canonicalize_object(payload).as_bytes());
        Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical JSON text for a payload: sorted keys, no whitespace.
pub fn canonicalize_object(payload: &Payload) -> String {
    let mut out = String::new();
    write_object(payload, &mut out);
    out
}

/// Canonical JSON text for any value.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        // Scalars already have a unique compact form.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(map: &serde_json::Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_value(&map[key.as_str()], out);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = payload(json!({"a": 1, "b": 2}));
        let b = payload(json!({"b": 2, "a": 1}));
        assert_eq!(Fingerprint::compute("w1", &a), Fingerprint::compute("w1", &b));
    }

    #[test]
    fn nested_key_order_does_not_matter() {
        let a = payload(json!({"outer": {"x": [1, {"q": true, "p": null}], "y": "s"}}));
        let b = payload(json!({"outer": {"y": "s", "x": [1, {"p": null, "q": true}]}}));
        assert_eq!(Fingerprint::compute("w1", &a), Fingerprint::compute("w1", &b));
    }

    #[test]
    fn fingerprint_distinguishes_inputs() {
        let base = payload(json!({"x": 1}));
        let cases = vec![
            ("different worker", Fingerprint::compute("w2", &base)),
            ("different value", Fingerprint::compute("w1", &payload(json!({"x": 2})))),
            ("different type", Fingerprint::compute("w1", &payload(json!({"x": "1"})))),
            ("array order", Fingerprint::compute("w1", &payload(json!({"x": [1, 2]})))),
        ];
        let reference = Fingerprint::compute("w1", &base);

        for (name, fingerprint) in cases {
            assert_ne!(reference, fingerprint, "case '{}'", name);
        }
        assert_ne!(
            Fingerprint::compute("w1", &payload(json!({"x": [1, 2]}))),
            Fingerprint::compute("w1", &payload(json!({"x": [2, 1]}))),
        );
    }

    #[test]
    fn canonical_form_is_sorted_and_compact() {
        let value = json!({"b": [true, {"d": 1, "c": "q\"uote"}], "a": null});
        assert_eq!(canonicalize(&value), r#"{"a":null,"b":[true,{"c":"q\"uote","d":1}]}"#);
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = Fingerprint::compute("w1", &Payload::new());
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp.short().len(), 12);
    }
}
