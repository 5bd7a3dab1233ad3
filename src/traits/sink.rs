// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::telemetry::TelemetryEvent;

/// External observer of gateway telemetry (e.g. a live dashboard).
///
/// Called on the bus dispatcher thread, never from the invocation path, so a
/// sink may block. A sink that panics is logged and skipped; the remaining
/// sinks still see the event.
pub trait TelemetrySink: Send + Sync {
    fn on_event(&self, topic: &str, event: &TelemetryEvent);
}

impl<F> TelemetrySink for F
where
    F: Fn(&str, &TelemetryEvent) + Send + Sync,
{
    fn on_event(&self, topic: &str, event: &TelemetryEvent) {
        self(topic, event)
    }
}
