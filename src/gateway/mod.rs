// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The invocation gateway and the components it coordinates.
//!
//! - [`AdmissionGate`]: process-wide halt switch
//! - [`WorkerRegistry`]: manifest of workers with lazily created handles
//! - [`TieredCache`]: in-process L1 backed by an optional shared L2
//! - [`ConcurrencyLimiter`]: bound on simultaneous worker calls
//! - [`Gateway`]: the per-request pipeline tying them together

mod admission;
mod cache;
mod fingerprint;
mod limiter;
mod orchestrator;
mod registry;


pub use admission::{AdmissionGate, GateState};
pub use cache::{CacheHealth, CacheSettings, L2Status, TieredCache, L2_KEY_PREFIX};
pub use fingerprint::{canonicalize, canonicalize_object, Fingerprint};
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use orchestrator::{
    Gateway, GatewayHealth, GatewayParts, GatewaySettings, LimiterHealth,
};
pub use registry::WorkerRegistry;
