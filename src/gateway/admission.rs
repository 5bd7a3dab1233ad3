// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide halt switch consulted before any work begins.
//!
//! Two states: `Open` (serving) and `Halted` (refusing). The hot-path read is a
//! single atomic load; the reason string is only read when halted.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::observability::messages::gateway::{AdmissionHalted, AdmissionReset};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Open,
    Halted,
}

/// Admission gate shared between the gateway and any outside subsystem that
/// may need to stop it (risk monitor, operator tooling).
///
/// ```
/// use the_gateway::gateway::{AdmissionGate, GateState};
///
/// let gate = AdmissionGate::new();
/// gate.trigger("maintenance");
/// assert!(gate.is_halted());
/// assert_eq!(gate.reason(), "maintenance");
///
/// gate.reset();
/// assert_eq!(gate.state(), GateState::Open);
/// assert_eq!(gate.reason(), "");
/// ```
#[derive(Debug, Default)]
pub struct AdmissionGate {
    halted: AtomicBool,
    reason: RwLock<String>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt the gateway. Re-triggering while halted overwrites the reason.
    pub fn trigger(&self, reason: impl Into<String>) {
        let reason = reason.into();
        AdmissionHalted { reason: &reason }.log();

        // Reason first, so a reader that sees `halted` also sees the new reason.
        let mut guard = self.reason.write();
        *guard = reason;
        self.halted.store(true, Ordering::Release);
    }

    /// Reopen the gateway. Resetting an open gate is a no-op.
    pub fn reset(&self) {
        let mut guard = self.reason.write();
        let previous = std::mem::take(&mut *guard);
        self.halted.store(false, Ordering::Release);
        drop(guard);

        AdmissionReset {
            previous_reason: &previous,
        }
        .log();
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    pub fn state(&self) -> GateState {
        if self.is_halted() {
            GateState::Halted
        } else {
            GateState::Open
        }
    }

    /// Current halt reason; empty while open.
    pub fn reason(&self) -> String {
        if !self.is_halted() {
            return String::new();
        }
        self.reason.read().clone()
    }

    /// `Some(reason)` while halted. This is the orchestrator's admission check.
    pub fn halt_reason(&self) -> Option<String> {
        if !self.is_halted() {
            return None;
        }
        let guard = self.reason.read();
        // A concurrent reset may have landed between the two reads.
        if self.is_halted() {
            Some(guard.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn new_gate_is_open() {
        let gate = AdmissionGate::new();
        assert!(!gate.is_halted());
        assert_eq!(gate.state(), GateState::Open);
        assert_eq!(gate.halt_reason(), None);
        assert_eq!(gate.reason(), "");
    }

    #[test]
    fn retrigger_overwrites_reason() {
        let gate = AdmissionGate::new();
        gate.trigger("first");
        gate.trigger("second");

        assert_eq!(gate.halt_reason(), Some("second".to_string()));
    }

    #[test]
    fn reset_is_idempotent() {
        let gate = AdmissionGate::new();
        gate.reset();
        gate.trigger("x");
        gate.reset();
        gate.reset();

        assert!(!gate.is_halted());
        assert_eq!(gate.halt_reason(), None);
    }

    #[test]
    fn concurrent_writers_leave_a_consistent_state() {
        let gate = Arc::new(AdmissionGate::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let gate = gate.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            gate.trigger(format!("writer-{}", i));
                        } else {
                            gate.reset();
                        }
                        let _ = gate.halt_reason();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        match gate.halt_reason() {
            Some(reason) => assert!(reason.starts_with("writer-")),
            None => assert!(!gate.is_halted()),
        }
    }
}
