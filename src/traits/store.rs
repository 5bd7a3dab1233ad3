// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::StoreError;

/// Shared key-value store backing the second cache tier.
///
/// Implementations must return [`StoreError::Unavailable`] on connection
/// failure instead of hanging; the cache additionally bounds every call with
/// its own timeout. Entries may vanish at any time.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` is a miss, not a failure.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration)
        -> Result<(), StoreError>;

    /// Connectivity probe used once when the cache is built.
    async fn ping(&self) -> Result<(), StoreError>;

    fn name(&self) -> &'static str;
}
