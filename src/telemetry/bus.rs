// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fire-and-forget publish/subscribe for gateway status events.
//!
//! `publish` never blocks and never fails: it appends to the topic's ring buffer
//! and pushes onto a bounded broadcast channel. A dedicated dispatcher thread
//! drains the channel and fans each event out to the registered sinks. Sinks are
//! synchronous and may block, so they never run on the async runtime that serves
//! invocations. When the dispatcher falls behind, the channel overwrites its
//! oldest events and the dispatcher logs how many it lost.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::observability::messages::telemetry::{
    DispatcherSpawnFailed, DispatcherStopped, SubscriberPanicked, TelemetryEventsDropped,
};
use crate::observability::messages::StructuredLog;
use crate::telemetry::TelemetryEvent;
use crate::traits::TelemetrySink;

/// An event together with the topic it was published on.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub topic: String,
    pub event: TelemetryEvent,
}

struct Subscription {
    // `None` subscribes to every topic.
    topic: Option<String>,
    sink: Arc<dyn TelemetrySink>,
}

type Subscriptions = Arc<RwLock<Vec<Subscription>>>;

pub struct TelemetryBus {
    sender: broadcast::Sender<Envelope>,
    buffers: Mutex<HashMap<String, VecDeque<TelemetryEvent>>>,
    subscriptions: Subscriptions,
    ring_buffer_size: usize,
    published: AtomicU64,
}

impl std::fmt::Debug for TelemetryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryBus")
            .field("topics", &self.buffers.lock().len())
            .field("subscribers", &self.subscriptions.read().len())
            .field("ring_buffer_size", &self.ring_buffer_size)
            .finish()
    }
}

impl TelemetryBus {
    /// Create the bus and start its dispatcher thread.
    ///
    /// The dispatcher exits once the bus is dropped. If the thread cannot be
    /// started, events are still buffered per topic but no sink is called.
    pub fn new(ring_buffer_size: usize, channel_capacity: usize) -> Self {
        let (sender, receiver) = broadcast::channel(channel_capacity.max(1));
        let subscriptions: Subscriptions = Arc::new(RwLock::new(Vec::new()));

        let dispatch_subscriptions = subscriptions.clone();
        if let Err(e) = std::thread::Builder::new()
            .name("telemetry-dispatch".into())
            .spawn(move || dispatch(receiver, dispatch_subscriptions))
        {
            DispatcherSpawnFailed { error: &e }.log();
        }

        Self {
            sender,
            buffers: Mutex::new(HashMap::new()),
            subscriptions,
            ring_buffer_size: ring_buffer_size.max(1),
            published: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, topic: &str, event: TelemetryEvent) {
        // Buffer append and channel send share the lock so both see the same
        // per-topic order.
        let mut buffers = self.buffers.lock();
        let buffer = buffers.entry(topic.to_string()).or_default();
        if buffer.len() >= self.ring_buffer_size {
            buffer.pop_front();
        }
        buffer.push_back(event.clone());

        // Err only means there is no receiver left.
        let _ = self.sender.send(Envelope {
            topic: topic.to_string(),
            event,
        });
        drop(buffers);

        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscribe(&self, topic: impl Into<String>, sink: impl TelemetrySink + 'static) {
        self.subscriptions.write().push(Subscription {
            topic: Some(topic.into()),
            sink: Arc::new(sink),
        });
    }

    pub fn subscribe_all(&self, sink: impl TelemetrySink + 'static) {
        self.subscriptions.write().push(Subscription {
            topic: None,
            sink: Arc::new(sink),
        });
    }

    /// Raw channel receiver for consumers that prefer to pull asynchronously.
    /// Lagging receivers see `RecvError::Lagged` and skip the oldest events.
    pub fn receiver(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Buffered events for `topic`, oldest first.
    pub fn recent(&self, topic: &str) -> Vec<TelemetryEvent> {
        self.buffers
            .lock()
            .get(topic)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.buffers.lock().keys().cloned().collect();
        topics.sort();
        topics
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

fn dispatch(mut receiver: broadcast::Receiver<Envelope>, subscriptions: Subscriptions) {
    loop {
        match receiver.blocking_recv() {
            Ok(envelope) => deliver(&envelope, &subscriptions),
            Err(broadcast::error::RecvError::Lagged(count)) => {
                TelemetryEventsDropped { count }.log();
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    DispatcherStopped.log();
}

fn deliver(envelope: &Envelope, subscriptions: &Subscriptions) {
    // Snapshot so a sink may subscribe further sinks without deadlocking.
    let sinks: Vec<(usize, Arc<dyn TelemetrySink>)> = subscriptions
        .read()
        .iter()
        .enumerate()
        .filter(|(_, sub)| {
            sub.topic
                .as_deref()
                .map_or(true, |topic| topic == envelope.topic)
        })
        .map(|(index, sub)| (index, sub.sink.clone()))
        .collect();

    for (index, sink) in sinks {
        let delivered = catch_unwind(AssertUnwindSafe(|| {
            sink.on_event(&envelope.topic, &envelope.event)
        }));
        if delivered.is_err() {
            SubscriberPanicked {
                topic: &envelope.topic,
                subscriber: index,
            }
            .log();
        }
    }
}
