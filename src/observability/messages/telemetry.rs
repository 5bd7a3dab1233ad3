// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for telemetry bus delivery problems.
//!
//! Telemetry is best-effort: everything here is logged and absorbed.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// The dispatcher fell behind and the channel overwrote its oldest events.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct TelemetryEventsDropped {
    pub count: u64,
}

impl Display for TelemetryEventsDropped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Telemetry dispatcher lagged, dropped {} oldest events",
            self.count
        )
    }
}

impl StructuredLog for TelemetryEventsDropped {
    fn log(&self) {
        tracing::warn!(count = self.count, "{}", self);
    }
}

/// A subscriber panicked while handling an event.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct SubscriberPanicked<'a> {
    pub topic: &'a str,
    pub subscriber: usize,
}

impl Display for SubscriberPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Telemetry subscriber #{} panicked on topic '{}', skipped",
            self.subscriber, self.topic
        )
    }
}

impl StructuredLog for SubscriberPanicked<'_> {
    fn log(&self) {
        tracing::error!(topic = self.topic, subscriber = self.subscriber, "{}", self);
    }
}

/// The dispatcher thread could not be started; sinks will not be called.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DispatcherSpawnFailed<'a> {
    pub error: &'a std::io::Error,
}

impl Display for DispatcherSpawnFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to start telemetry dispatcher: {}", self.error)
    }
}

impl StructuredLog for DispatcherSpawnFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}

/// The dispatcher thread exited because the bus was dropped.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct DispatcherStopped;

impl Display for DispatcherStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Telemetry dispatcher stopped")
    }
}

impl StructuredLog for DispatcherStopped {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}
