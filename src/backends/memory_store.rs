// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::consts::MAX_CACHE_TTL_SECONDS;
use crate::errors::StoreError;
use crate::traits::KeyValueStore;

/// Process-local key-value store with per-key expiry.
///
/// Expired keys are dropped when read and swept on every write, so keys that
/// are written once and never read again do not accumulate.
///
/// `set_available(false)` makes every operation fail with
/// [`StoreError::Unavailable`], standing in for a network partition.
#[derive(Debug)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Keys held, including expired ones not yet swept.
    pub fn stored(&self) -> usize {
        self.entries.lock().len()
    }

    /// Live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;

        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.check_available()?;

        let now = Instant::now();
        let ttl = ttl.min(Duration::from_secs(MAX_CACHE_TTL_SECONDS));
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        let mut entries = self.entries.lock();
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_expire_after_ttl() {
        let store = InMemoryStore::new();
        store
            .set_with_ttl("k", "v".to_string(), Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn writes_sweep_expired_keys() {
        let store = InMemoryStore::new();
        for key in ["a", "b", "c"] {
            store
                .set_with_ttl(key, "v".to_string(), Duration::from_millis(10))
                .await
                .unwrap();
        }
        assert_eq!(store.stored(), 3);

        tokio::time::sleep(Duration::from_millis(30)).await;
        store
            .set_with_ttl("d", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.stored(), 1);
        assert_eq!(store.get("d").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn huge_ttl_does_not_overflow() {
        let store = InMemoryStore::new();
        store
            .set_with_ttl("k", "v".to_string(), Duration::MAX)
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = InMemoryStore::new();
        store.set_available(false);

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(store.get("k").await, Err(StoreError::Unavailable(_))));

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }
}
