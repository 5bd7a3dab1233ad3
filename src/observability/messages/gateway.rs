// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the admission gate and the invocation lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Admission gate transitions (halt, reset)
//! * Requests refused before any work starts
//! * Worker call lifecycle (start, completion, failure, timeout, panic)
//! * Single-flight joins and caller cancellation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Gateway assembled and ready to serve.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GatewayStarted<'a> {
    pub worker_count: usize,
    pub max_concurrency: usize,
    pub l2_status: &'a str,
    pub single_flight: bool,
}

impl Display for GatewayStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Gateway started: {} workers, max_concurrency={}, l2={}, single_flight={}",
            self.worker_count, self.max_concurrency, self.l2_status, self.single_flight
        )
    }
}

impl StructuredLog for GatewayStarted<'_> {
    fn log(&self) {
        tracing::info!(
            worker_count = self.worker_count,
            max_concurrency = self.max_concurrency,
            l2_status = self.l2_status,
            single_flight = self.single_flight,
            "{}", self
        );
    }
}

/// Admission gate moved to (or stayed in) the halted state.
///
/// # Log Level
/// `warn!` - The gateway is refusing all work
///
/// # Example
/// ```
/// use the_gateway::observability::messages::gateway::AdmissionHalted;
///
/// let msg = AdmissionHalted { reason: "risk limit breached" };
/// tracing::warn!("{}", msg);
/// ```
pub struct AdmissionHalted<'a> {
    pub reason: &'a str,
}

impl Display for AdmissionHalted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Admission gate halted: {}", self.reason)
    }
}

impl StructuredLog for AdmissionHalted<'_> {
    fn log(&self) {
        tracing::warn!(reason = self.reason, "{}", self);
    }
}

/// Admission gate reopened.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AdmissionReset<'a> {
    pub previous_reason: &'a str,
}

impl Display for AdmissionReset<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.previous_reason.is_empty() {
            write!(f, "Admission gate reset (was already open)")
        } else {
            write!(
                f,
                "Admission gate reset, previously halted for: {}",
                self.previous_reason
            )
        }
    }
}

impl StructuredLog for AdmissionReset<'_> {
    fn log(&self) {
        tracing::info!(previous_reason = self.previous_reason, "{}", self);
    }
}

/// Request refused because the gateway is halted.
///
/// # Log Level
/// `warn!` - Work refused
pub struct InvocationRejected<'a> {
    pub worker_id: &'a str,
    pub reason: &'a str,
}

impl Display for InvocationRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation of '{}' rejected, gateway halted: {}",
            self.worker_id, self.reason
        )
    }
}

impl StructuredLog for InvocationRejected<'_> {
    fn log(&self) {
        tracing::warn!(worker_id = self.worker_id, reason = self.reason, "{}", self);
    }
}

/// A request waited for a limiter slot and found the gate halted once admitted.
///
/// # Log Level
/// `warn!` - Work refused
pub struct HaltedWhileQueued<'a> {
    pub worker_id: &'a str,
    pub reason: &'a str,
}

impl Display for HaltedWhileQueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Gateway halted while '{}' waited for a slot, call not started: {}",
            self.worker_id, self.reason
        )
    }
}

impl StructuredLog for HaltedWhileQueued<'_> {
    fn log(&self) {
        tracing::warn!(worker_id = self.worker_id, reason = self.reason, "{}", self);
    }
}

/// Worker ID missing from the manifest.
///
/// # Log Level
/// `warn!` - Client error
pub struct WorkerNotFound<'a> {
    pub worker_id: &'a str,
}

impl Display for WorkerNotFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' is not in the manifest", self.worker_id)
    }
}

impl StructuredLog for WorkerNotFound<'_> {
    fn log(&self) {
        tracing::warn!(worker_id = self.worker_id, "{}", self);
    }
}

/// A request joined an identical call that is already running.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct InvocationJoined<'a> {
    pub worker_id: &'a str,
    pub fingerprint: &'a str,
}

impl Display for InvocationJoined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Joined in-flight invocation of '{}' ({})",
            self.worker_id, self.fingerprint
        )
    }
}

impl StructuredLog for InvocationJoined<'_> {
    fn log(&self) {
        tracing::debug!(
            worker_id = self.worker_id,
            fingerprint = self.fingerprint,
            "{}", self
        );
    }
}

/// Worker call started after a limiter slot was granted.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerCallStarted<'a> {
    pub worker_id: &'a str,
    pub fingerprint: &'a str,
    pub in_flight: usize,
    pub capacity: usize,
}

impl Display for WorkerCallStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' call started ({}/{} slots in use)",
            self.worker_id, self.in_flight, self.capacity
        )
    }
}

impl StructuredLog for WorkerCallStarted<'_> {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            fingerprint = self.fingerprint,
            in_flight = self.in_flight,
            capacity = self.capacity,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker_call",
            span_name = name,
            worker_id = self.worker_id,
            fingerprint = self.fingerprint,
        )
    }
}

/// Worker call succeeded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkerCallCompleted<'a> {
    pub worker_id: &'a str,
    pub duration: Duration,
}

impl Display for WorkerCallCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' completed in {:?}",
            self.worker_id, self.duration
        )
    }
}

impl StructuredLog for WorkerCallCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Worker call returned an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_gateway::observability::messages::gateway::WorkerCallFailed;
/// use std::time::Duration;
///
/// let msg = WorkerCallFailed {
///     worker_id: "w1",
///     error: "upstream model overloaded",
///     duration: Duration::from_millis(40),
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerCallFailed<'a> {
    pub worker_id: &'a str,
    pub error: &'a str,
    pub duration: Duration,
}

impl Display for WorkerCallFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' failed after {:?}: {}",
            self.worker_id, self.duration, self.error
        )
    }
}

impl StructuredLog for WorkerCallFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_id = self.worker_id,
            error = self.error,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Worker call exceeded its deadline; its slot was released.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerCallTimedOut<'a> {
    pub worker_id: &'a str,
    pub timeout: Duration,
}

impl Display for WorkerCallTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker '{}' timed out after {:?}",
            self.worker_id, self.timeout
        )
    }
}

impl StructuredLog for WorkerCallTimedOut<'_> {
    fn log(&self) {
        tracing::error!(
            worker_id = self.worker_id,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }
}

/// Worker panicked during a call.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct WorkerPanicked<'a> {
    pub worker_id: &'a str,
    pub message: &'a str,
}

impl Display for WorkerPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker '{}' panicked: {}", self.worker_id, self.message)
    }
}

impl StructuredLog for WorkerPanicked<'_> {
    fn log(&self) {
        tracing::error!(worker_id = self.worker_id, panic = self.message, "{}", self);
    }
}

/// Caller gave up; the worker call (if any) continues and still fills the cache.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InvocationCancelled<'a> {
    pub worker_id: &'a str,
}

impl Display for InvocationCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Caller cancelled invocation of '{}', in-flight work will still be cached",
            self.worker_id
        )
    }
}

impl StructuredLog for InvocationCancelled<'_> {
    fn log(&self) {
        tracing::info!(worker_id = self.worker_id, "{}", self);
    }
}

/// The task driving a call ended without publishing a result.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct LeaderVanished<'a> {
    pub worker_id: &'a str,
    pub fingerprint: &'a str,
}

impl Display for LeaderVanished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation task for '{}' ({}) ended without a result",
            self.worker_id, self.fingerprint
        )
    }
}

impl StructuredLog for LeaderVanished<'_> {
    fn log(&self) {
        tracing::error!(
            worker_id = self.worker_id,
            fingerprint = self.fingerprint,
            "{}", self
        );
    }
}
