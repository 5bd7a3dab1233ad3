// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod sink;
pub mod store;
pub mod worker;

pub use sink::TelemetrySink;
pub use store::KeyValueStore;
pub use worker::Worker;
