// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod gateway;

pub use config::{ConfigError, ValidationError};
pub use gateway::{GatewayError, RegistryError, StoreError, WorkerError};
