// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] for emitting it as a structured `tracing` event at the
//! level the message belongs to.
//!
//! # Organization
//!
//! * `gateway` - Admission gate and invocation lifecycle events
//! * `cache` - Cache tier events
//! * `registry` - Worker handle lifecycle events
//! * `telemetry` - Telemetry bus events
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_gateway::observability::messages::StructuredLog;
//! use the_gateway::observability::messages::gateway::AdmissionHalted;
//!
//! let msg = AdmissionHalted { reason: "maintenance" };
//! msg.log();
//! assert_eq!(msg.to_string(), "Admission gate halted: maintenance");
//! ```

use tracing::Span;

pub mod cache;
pub mod gateway;
pub mod registry;
pub mod telemetry;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: std::fmt::Display {
    /// Emit the message as a `tracing` event.
    fn log(&self);

    /// A span carrying the message's fields. Most messages are point events and
    /// keep the default.
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("gateway", span_name = name)
    }
}
