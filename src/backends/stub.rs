// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scripted collaborators for tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::backends::memory_store::InMemoryStore;
use crate::errors::{StoreError, WorkerError};
use crate::model::{Payload, WorkerHandle, WorkerOutput};
use crate::traits::{KeyValueStore, Worker};

/// Echoes the payload after an optional delay and counts its calls.
#[derive(Debug, Default)]
pub struct CountingWorker {
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for CountingWorker {
    async fn invoke(
        &self,
        handle: &WorkerHandle,
        payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(
            WorkerOutput::new(json!({ "worker": handle.id(), "echo": Value::Object(payload.clone()) }))
                .with_metadata("call", json!(call)),
        )
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Always fails with the configured message.
#[derive(Debug)]
pub struct FailingWorker {
    calls: AtomicUsize,
    message: String,
}

impl FailingWorker {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            message: message.into(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for FailingWorker {
    async fn invoke(
        &self,
        _handle: &WorkerHandle,
        _payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WorkerError::new(self.message.clone()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Holds every call until the test releases it, tracking peak concurrency.
#[derive(Debug)]
pub struct BlockingWorker {
    gate: Semaphore,
    calls: AtomicUsize,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Default for BlockingWorker {
    fn default() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

impl BlockingWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` held (or future) calls complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` calls have started.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("worker calls did not start in time");
    }
}

#[async_trait]
impl Worker for BlockingWorker {
    async fn invoke(
        &self,
        handle: &WorkerHandle,
        _payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        let released = self.gate.acquire().await;
        if let Ok(permit) = released {
            permit.forget();
        }

        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(WorkerOutput::new(json!({ "worker": handle.id() })))
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}

#[derive(Debug, Default)]
pub struct PanickingWorker;

#[async_trait]
impl Worker for PanickingWorker {
    async fn invoke(
        &self,
        _handle: &WorkerHandle,
        _payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        panic!("worker exploded")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

/// Never returns.
#[derive(Debug, Default)]
pub struct HangingWorker {
    calls: AtomicUsize,
}

impl HangingWorker {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for HangingWorker {
    async fn invoke(
        &self,
        _handle: &WorkerHandle,
        _payload: &Payload,
    ) -> Result<WorkerOutput, WorkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Err(WorkerError::new("unreachable"))
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

/// A shared store that refuses every connection.
#[derive(Debug, Default)]
pub struct UnreachableStore;

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

/// An in-memory store whose writes take `write_delay` to land.
#[derive(Debug)]
pub struct SlowStore {
    inner: InMemoryStore,
    write_delay: Duration,
}

impl SlowStore {
    pub fn new(write_delay: Duration) -> Self {
        Self {
            inner: InMemoryStore::new(),
            write_delay,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        tokio::time::sleep(self.write_delay).await;
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}
