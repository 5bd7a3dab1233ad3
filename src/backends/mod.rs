// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in implementations of the gateway's collaborator traits.
//!
//! # Available Backends
//!
//! ## Local Worker
//! In-process worker that dispatches on the handle's role:
//! - **echo**: returns the payload unchanged
//! - **uppercase**: upper-cases the payload's `text` field
//! - **word_count**: character, word and line counts for `text`
//!
//! ## In-Memory Store
//! A [`KeyValueStore`](crate::traits::KeyValueStore) living in process memory,
//! with per-key TTL and a switch that simulates an outage. Useful as a shared
//! tier between gateways in the same process and for exercising degraded paths.
//!
//! ## Stub Backend (Test-Only)
//! Workers and stores with scripted behavior (counting, failing, blocking,
//! panicking, hanging, unreachable). Not available in production builds.
//!
//! # Examples
//!
//! ```rust
//! use the_gateway::backends::local::LocalWorker;
//! use the_gateway::traits::Worker;
//!
//! let worker = LocalWorker::new();
//! assert_eq!(worker.name(), "local");
//! ```

pub mod local;
pub mod memory_store;
#[cfg(test)]
pub mod stub;
