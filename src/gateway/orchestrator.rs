// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request orchestration: admission, cache, registry, limiter, worker, telemetry.
//!
//! Every request runs the same sequence:
//!
//! 1. **Admission** - a halted gateway refuses before doing anything else.
//! 2. **Cache lookup** - a hit is returned as-is and never touches the limiter.
//! 3. **Resolve** - unknown worker IDs fail fast, also without a limiter slot.
//! 4. **Join or lead** - an identical call already in flight is joined;
//!    otherwise a task is spawned that acquires a slot, calls the worker under a
//!    deadline, caches a success in L1 and publishes telemetry. Waiters are
//!    resolved before the time-bounded write to the shared tier.
//!
//! The worker call lives in its own task, so a caller that gives up (drops the
//! future or cancels) never leaves a slot held or a result uncached.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::consts::DEFAULT_WORKER_TIMEOUT_SECONDS;
use crate::errors::GatewayError;
use crate::gateway::{
    AdmissionGate, CacheHealth, ConcurrencyLimiter, Fingerprint, GateState, TieredCache,
    WorkerRegistry,
};
use crate::model::{
    ErrorKind, InvocationRequest, InvocationResult, Payload, WorkerHandle, WorkerSummary,
};
use crate::observability::messages::gateway::{
    HaltedWhileQueued, InvocationCancelled, InvocationJoined, InvocationRejected,
    LeaderVanished, WorkerCallCompleted, WorkerCallFailed, WorkerCallStarted,
    WorkerCallTimedOut, WorkerNotFound, WorkerPanicked,
};
use crate::observability::messages::StructuredLog;
use crate::telemetry::{worker_topic, TelemetryBus, TelemetryEvent};
use crate::traits::Worker;

type PendingResult = Shared<BoxFuture<'static, InvocationResult>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Deadline for a single worker call.
    pub worker_timeout: Duration,
    /// Collapse concurrent identical requests into one worker call.
    pub single_flight: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            worker_timeout: Duration::from_secs(DEFAULT_WORKER_TIMEOUT_SECONDS),
            single_flight: true,
        }
    }
}

/// The collaborators a gateway is assembled from.
pub struct GatewayParts {
    pub admission: Arc<AdmissionGate>,
    pub registry: Arc<WorkerRegistry>,
    pub cache: Arc<TieredCache>,
    pub limiter: Arc<ConcurrencyLimiter>,
    pub telemetry: Arc<TelemetryBus>,
    pub worker: Arc<dyn Worker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimiterHealth {
    pub capacity: usize,
    pub in_flight: usize,
    pub acquisitions: u64,
}

/// Point-in-time view of the gateway for health endpoints and dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayHealth {
    pub state: GateState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halt_reason: Option<String>,
    pub limiter: LimiterHealth,
    pub cache: CacheHealth,
    pub active_workers: Vec<WorkerSummary>,
    pub in_flight_invocations: usize,
}

struct Inner {
    admission: Arc<AdmissionGate>,
    registry: Arc<WorkerRegistry>,
    cache: Arc<TieredCache>,
    limiter: Arc<ConcurrencyLimiter>,
    telemetry: Arc<TelemetryBus>,
    worker: Arc<dyn Worker>,
    inflight: Mutex<HashMap<Fingerprint, PendingResult>>,
    settings: GatewaySettings,
}

/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("worker", &self.inner.worker.name())
            .field("admission", &self.inner.admission.state())
            .field("limiter", &self.inner.limiter)
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl Gateway {
    pub fn new(parts: GatewayParts, settings: GatewaySettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                admission: parts.admission,
                registry: parts.registry,
                cache: parts.cache,
                limiter: parts.limiter,
                telemetry: parts.telemetry,
                worker: parts.worker,
                inflight: Mutex::new(HashMap::new()),
                settings,
            }),
        }
    }

    /// Run one invocation to completion. Never fails: every outcome, including
    /// refusals, is an [`InvocationResult`].
    pub async fn invoke(&self, worker_id: &str, payload: &Payload) -> InvocationResult {
        if let Some(reason) = self.inner.admission.halt_reason() {
            InvocationRejected {
                worker_id,
                reason: &reason,
            }
            .log();
            return InvocationResult::failure(ErrorKind::SystemHalted, reason);
        }

        let fingerprint = Fingerprint::compute(worker_id, payload);

        if let Some(hit) = self.inner.cache.get(&fingerprint).await {
            return hit;
        }

        let handle = match self.inner.registry.resolve(worker_id) {
            Ok(handle) => handle,
            Err(e) => {
                WorkerNotFound { worker_id }.log();
                return InvocationResult::failure(ErrorKind::WorkerNotFound, e.to_string());
            }
        };

        let pending = match self.join_or_lead(handle, fingerprint, payload) {
            Ok(pending) => pending,
            Err(hit) => return hit,
        };
        pending.await
    }

    pub async fn invoke_request(&self, request: &InvocationRequest) -> InvocationResult {
        self.invoke(&request.worker_id, &request.payload).await
    }

    /// Like [`Gateway::invoke`], but returns `Cancelled` as soon as `cancel` fires.
    ///
    /// A worker call that already started keeps running and still fills the cache.
    pub async fn invoke_with_cancellation(
        &self,
        worker_id: &str,
        payload: &Payload,
        cancel: &CancellationToken,
    ) -> InvocationResult {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                InvocationCancelled { worker_id }.log();
                InvocationResult::failure(
                    ErrorKind::Cancelled,
                    format!("invocation of '{}' cancelled by caller", worker_id),
                )
            }
            result = self.invoke(worker_id, payload) => result,
        }
    }

    pub fn health(&self) -> GatewayHealth {
        let inner = &self.inner;
        GatewayHealth {
            state: inner.admission.state(),
            halt_reason: inner.admission.halt_reason(),
            limiter: LimiterHealth {
                capacity: inner.limiter.capacity(),
                in_flight: inner.limiter.in_flight(),
                acquisitions: inner.limiter.acquisitions(),
            },
            cache: inner.cache.health(),
            active_workers: inner.registry.list_active(),
            in_flight_invocations: self.in_flight_invocations(),
        }
    }

    /// Distinct calls currently registered for joining.
    pub fn in_flight_invocations(&self) -> usize {
        self.inner.inflight.lock().len()
    }

    pub fn admission(&self) -> &Arc<AdmissionGate> {
        &self.inner.admission
    }

    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.inner.registry
    }

    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.inner.cache
    }

    pub fn limiter(&self) -> &Arc<ConcurrencyLimiter> {
        &self.inner.limiter
    }

    pub fn telemetry(&self) -> &Arc<TelemetryBus> {
        &self.inner.telemetry
    }

    pub fn settings(&self) -> GatewaySettings {
        self.inner.settings
    }

    // `Err` carries a result that landed in L1 while we were looking.
    fn join_or_lead(
        &self,
        handle: Arc<WorkerHandle>,
        fingerprint: Fingerprint,
        payload: &Payload,
    ) -> Result<PendingResult, InvocationResult> {
        if !self.inner.settings.single_flight {
            return Ok(self.lead(handle, fingerprint, payload.clone(), false));
        }

        let mut inflight = self.inner.inflight.lock();
        if let Some(pending) = inflight.get(&fingerprint) {
            InvocationJoined {
                worker_id: handle.id(),
                fingerprint: fingerprint.short(),
            }
            .log();
            return Ok(pending.clone());
        }

        // A leader caches before it deregisters, so a result missing from the map
        // is either in L1 by now or was never computed.
        if let Some(hit) = self.inner.cache.get_local(&fingerprint) {
            return Err(hit);
        }

        let pending = self.lead(handle, fingerprint.clone(), payload.clone(), true);
        inflight.insert(fingerprint, pending.clone());
        Ok(pending)
    }

    fn lead(
        &self,
        handle: Arc<WorkerHandle>,
        fingerprint: Fingerprint,
        payload: Payload,
        registered: bool,
    ) -> PendingResult {
        let (tx, rx) = oneshot::channel::<InvocationResult>();

        let worker_id = handle.id().to_string();
        let short = fingerprint.short().to_string();
        let pending = rx
            .map(move |received| {
                received.unwrap_or_else(|_| {
                    LeaderVanished {
                        worker_id: &worker_id,
                        fingerprint: &short,
                    }
                    .log();
                    InvocationResult::failure(
                        ErrorKind::Internal,
                        GatewayError::LeaderVanished(short.clone()).to_string(),
                    )
                })
            })
            .boxed()
            .shared();

        let guard = registered.then(|| InflightGuard {
            inner: self.inner.clone(),
            fingerprint: fingerprint.clone(),
        });
        let inner = self.inner.clone();

        tokio::spawn(async move {
            let result = inner.run_leader(&handle, &fingerprint, &payload).await;
            drop(guard);
            // Err means every waiter has gone away; L1 already has the result.
            let _ = tx.send(result.clone());

            // Waiters are resolved first; the shared tier is written behind them.
            inner
                .cache
                .put_shared(&fingerprint, &result, inner.cache.default_ttl())
                .await;
        });

        pending
    }
}

impl Inner {
    async fn run_leader(
        &self,
        handle: &WorkerHandle,
        fingerprint: &Fingerprint,
        payload: &Payload,
    ) -> InvocationResult {
        let worker_id = handle.id();

        let permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => return InvocationResult::failure(ErrorKind::Internal, e.to_string()),
        };

        // The gate may have tripped while we queued.
        if let Some(reason) = self.admission.halt_reason() {
            HaltedWhileQueued {
                worker_id,
                reason: &reason,
            }
            .log();
            return InvocationResult::failure(ErrorKind::SystemHalted, reason);
        }

        let topic = worker_topic(worker_id);
        let started = WorkerCallStarted {
            worker_id,
            fingerprint: fingerprint.short(),
            in_flight: self.limiter.in_flight(),
            capacity: self.limiter.capacity(),
        };
        started.log();
        let span = started.span("invoke");

        self.telemetry.publish(&topic, TelemetryEvent::busy(worker_id));

        let timeout = self.settings.worker_timeout;
        let start = Instant::now();
        let call = AssertUnwindSafe(self.worker.invoke(handle, payload)).catch_unwind();
        let outcome = tokio::time::timeout(timeout, call).instrument(span).await;
        drop(permit);
        let duration = start.elapsed();

        let result = match outcome {
            Err(_) => {
                WorkerCallTimedOut { worker_id, timeout }.log();
                InvocationResult::failure(
                    ErrorKind::Timeout,
                    format!("worker '{}' did not respond within {:?}", worker_id, timeout),
                )
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                WorkerPanicked {
                    worker_id,
                    message: &message,
                }
                .log();
                InvocationResult::failure(
                    ErrorKind::WorkerError,
                    format!("worker panicked: {}", message),
                )
            }
            Ok(Ok(Err(e))) => {
                WorkerCallFailed {
                    worker_id,
                    error: &e.message,
                    duration,
                }
                .log();
                InvocationResult::failure(ErrorKind::WorkerError, e.message)
            }
            Ok(Ok(Ok(output))) => {
                WorkerCallCompleted {
                    worker_id,
                    duration,
                }
                .log();
                InvocationResult::from(output)
            }
        };

        self.cache
            .put_local(fingerprint, result.clone(), self.cache.default_ttl());
        self.telemetry
            .publish(&topic, TelemetryEvent::from_result(worker_id, &result));

        result
    }
}

/// Deregisters a leader's in-flight entry on every exit, panics included.
struct InflightGuard {
    inner: Arc<Inner>,
    fingerprint: Fingerprint,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.inner.inflight.lock().remove(&self.fingerprint);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages_are_recovered_from_common_payloads() {
        let cases: Vec<(Box<dyn Any + Send>, &str)> = vec![
            (Box::new("static str"), "static str"),
            (Box::new("owned".to_string()), "owned"),
            (Box::new(42_u32), "unknown panic payload"),
        ];

        for (payload, expected) in cases {
            assert_eq!(panic_message(payload.as_ref()), expected);
        }
    }

    #[test]
    fn default_settings_enable_single_flight() {
        let settings = GatewaySettings::default();
        assert!(settings.single_flight);
        assert_eq!(settings.worker_timeout, Duration::from_secs(120));
    }
}
