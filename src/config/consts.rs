// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default limiter capacity (concurrent worker calls across the pool)
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
/// Default lifetime of a cached result in either tier (5 minutes)
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
/// Default deadline for a single worker call
pub const DEFAULT_WORKER_TIMEOUT_SECONDS: u64 = 120;
/// Default deadline for a single shared-tier cache operation
pub const DEFAULT_L2_TIMEOUT_MS: u64 = 250;
/// Default bound on in-process cache entries
pub const DEFAULT_L1_MAX_ENTRIES: usize = 10_000;
/// Events retained per telemetry topic for late readers
pub const DEFAULT_RING_BUFFER_SIZE: usize = 1000;
/// Telemetry events queued for the dispatcher before the oldest are dropped
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
/// Longest lifetime a cached result may be given (10 years)
pub const MAX_CACHE_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
