// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // built-in workers and stores
pub mod config;     // config loading + gateway builder
pub mod errors;     // error handling
pub mod gateway;    // admission, cache, limiter, orchestration
pub mod model;      // requests, results, worker definitions
pub mod observability;
pub mod telemetry;  // worker status pub/sub
pub mod traits;     // collaborator abstractions
