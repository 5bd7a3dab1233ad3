// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Worker status telemetry for external observers.

pub mod bus;
pub mod event;

pub use bus::{Envelope, TelemetryBus};
pub use event::{worker_topic, Phase, TelemetryEvent};
