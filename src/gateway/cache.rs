// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Two-tier result cache.
//!
//! L1 is an in-process map with lazy expiry: an expired entry is evicted when
//! that exact key is next read, never by a background sweep. L2 is a shared
//! key-value store with its own TTL. It is read-through (an L2 hit backfills L1)
//! and write-through on a best-effort basis: every L2 call is time-bounded and
//! its failures are logged and absorbed, never surfaced to a caller.
//!
//! If L2 cannot be reached when the cache is built, the cache runs L1-only and
//! reports the degraded state through [`TieredCache::health`].

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::consts::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_L1_MAX_ENTRIES, DEFAULT_L2_TIMEOUT_MS,
    MAX_CACHE_TTL_SECONDS,
};
use crate::errors::StoreError;
use crate::gateway::Fingerprint;
use crate::model::InvocationResult;
use crate::observability::messages::cache::{
    CacheCapacityReached, CacheDegraded, CacheEntryExpired, CacheHit, L2ReadFailed,
    L2WriteFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::KeyValueStore;

/// Prefix applied to fingerprints when used as shared-store keys.
pub const L2_KEY_PREFIX: &str = "invocation:";

#[derive(Debug, Clone)]
struct CacheEntry {
    result: InvocationResult,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub default_ttl: Duration,
    pub l2_timeout: Duration,
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            l2_timeout: Duration::from_millis(DEFAULT_L2_TIMEOUT_MS),
            max_entries: DEFAULT_L1_MAX_ENTRIES,
        }
    }
}

/// State of the shared tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum L2Status {
    Connected { store: String },
    /// A store was configured but unreachable at startup; serving L1-only.
    Degraded { store: String, reason: String },
    /// No shared store configured.
    Disabled,
}

impl L2Status {
    pub fn label(&self) -> &'static str {
        match self {
            L2Status::Connected { .. } => "connected",
            L2Status::Degraded { .. } => "degraded",
            L2Status::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheHealth {
    pub l1_entries: usize,
    pub l1_max_entries: usize,
    pub l2: L2Status,
}

pub struct TieredCache {
    l1: Mutex<HashMap<Fingerprint, CacheEntry>>,
    l2: Option<Arc<dyn KeyValueStore>>,
    l2_status: L2Status,
    settings: CacheSettings,
}

impl std::fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("l1_entries", &self.l1.lock().len())
            .field("l2", &self.l2_status)
            .field("settings", &self.settings)
            .finish()
    }
}

impl TieredCache {
    pub fn l1_only(settings: CacheSettings) -> Self {
        Self {
            l1: Mutex::new(HashMap::new()),
            l2: None,
            l2_status: L2Status::Disabled,
            settings,
        }
    }

    /// Build the cache, probing the shared store once.
    ///
    /// An unreachable store never prevents startup: the cache degrades to L1-only.
    pub async fn connect(store: Option<Arc<dyn KeyValueStore>>, settings: CacheSettings) -> Self {
        let Some(store) = store else {
            return Self::l1_only(settings);
        };

        let probe = match tokio::time::timeout(settings.l2_timeout, store.ping()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(settings.l2_timeout)),
        };

        match probe {
            Ok(()) => Self {
                l1: Mutex::new(HashMap::new()),
                l2_status: L2Status::Connected {
                    store: store.name().to_string(),
                },
                l2: Some(store),
                settings,
            },
            Err(e) => {
                let reason = e.to_string();
                CacheDegraded {
                    store: store.name(),
                    reason: &reason,
                }
                .log();
                Self {
                    l1: Mutex::new(HashMap::new()),
                    l2: None,
                    l2_status: L2Status::Degraded {
                        store: store.name().to_string(),
                        reason,
                    },
                    settings,
                }
            }
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.settings.default_ttl
    }

    /// L1, then L2. An L2 hit is copied into L1 with a fresh default TTL.
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<InvocationResult> {
        if let Some(result) = self.get_local(fingerprint) {
            return Some(result);
        }

        let store = self.l2.as_ref()?;
        let key = l2_key(fingerprint);
        let read = match tokio::time::timeout(self.settings.l2_timeout, store.get(&key)).await {
            Ok(read) => read,
            Err(_) => Err(StoreError::Timeout(self.settings.l2_timeout)),
        };

        let raw = match read {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                L2ReadFailed {
                    store: store.name(),
                    fingerprint: fingerprint.short(),
                    error: &e,
                }
                .log();
                return None;
            }
        };

        let result = match serde_json::from_str::<InvocationResult>(&raw) {
            Ok(result) if result.is_success() => result,
            Ok(_) => return None,
            Err(e) => {
                let e = StoreError::Corrupt(e.to_string());
                L2ReadFailed {
                    store: store.name(),
                    fingerprint: fingerprint.short(),
                    error: &e,
                }
                .log();
                return None;
            }
        };

        CacheHit {
            fingerprint: fingerprint.short(),
            tier: "l2",
        }
        .log();
        self.put_local(fingerprint, result.clone(), self.settings.default_ttl);
        Some(result)
    }

    /// L1-only lookup. Evicts the entry if it has expired.
    pub fn get_local(&self, fingerprint: &Fingerprint) -> Option<InvocationResult> {
        let mut l1 = self.l1.lock();
        let entry = l1.get(fingerprint)?;

        if entry.is_expired(Instant::now()) {
            l1.remove(fingerprint);
            drop(l1);
            CacheEntryExpired {
                fingerprint: fingerprint.short(),
            }
            .log();
            return None;
        }

        let result = entry.result.clone();
        drop(l1);
        CacheHit {
            fingerprint: fingerprint.short(),
            tier: "l1",
        }
        .log();
        Some(result)
    }

    /// Store a successful result in L1, then best-effort in L2.
    ///
    /// Failures are never cached; returns `false` when `result` was not stored.
    pub async fn put(
        &self,
        fingerprint: &Fingerprint,
        result: InvocationResult,
        ttl: Duration,
    ) -> bool {
        if !self.put_local(fingerprint, result.clone(), ttl) {
            return false;
        }
        self.put_shared(fingerprint, &result, ttl).await;
        true
    }

    /// Best-effort L2-only write. Returns `false` for failures or without a store.
    pub async fn put_shared(
        &self,
        fingerprint: &Fingerprint,
        result: &InvocationResult,
        ttl: Duration,
    ) -> bool {
        if !result.is_success() {
            return false;
        }
        let Some(store) = self.l2.as_ref() else {
            return false;
        };
        self.write_through(store.as_ref(), fingerprint, result, clamp_ttl(ttl))
            .await;
        true
    }

    /// L1-only write.
    pub fn put_local(
        &self,
        fingerprint: &Fingerprint,
        result: InvocationResult,
        ttl: Duration,
    ) -> bool {
        if !result.is_success() {
            return false;
        }

        let now = Instant::now();
        let mut l1 = self.l1.lock();
        if !l1.contains_key(fingerprint) && l1.len() >= self.settings.max_entries {
            Self::make_room(&mut l1, now, self.settings.max_entries);
        }
        l1.insert(
            fingerprint.clone(),
            CacheEntry {
                result,
                expires_at: expiry_after(now, ttl),
            },
        );
        true
    }

    pub fn invalidate(&self, fingerprint: &Fingerprint) -> bool {
        self.l1.lock().remove(fingerprint).is_some()
    }

    pub fn clear(&self) {
        self.l1.lock().clear();
    }

    /// Entries currently held in L1, expired or not.
    pub fn len(&self) -> usize {
        self.l1.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn health(&self) -> CacheHealth {
        CacheHealth {
            l1_entries: self.len(),
            l1_max_entries: self.settings.max_entries,
            l2: self.l2_status.clone(),
        }
    }

    async fn write_through(
        &self,
        store: &dyn KeyValueStore,
        fingerprint: &Fingerprint,
        result: &InvocationResult,
        ttl: Duration,
    ) {
        let encoded = match serde_json::to_string(result) {
            Ok(encoded) => encoded,
            Err(e) => {
                let e = StoreError::Corrupt(e.to_string());
                L2WriteFailed {
                    store: store.name(),
                    fingerprint: fingerprint.short(),
                    error: &e,
                }
                .log();
                return;
            }
        };

        let key = l2_key(fingerprint);
        let write = match tokio::time::timeout(
            self.settings.l2_timeout,
            store.set_with_ttl(&key, encoded, ttl),
        )
        .await
        {
            Ok(write) => write,
            Err(_) => Err(StoreError::Timeout(self.settings.l2_timeout)),
        };

        if let Err(e) = write {
            L2WriteFailed {
                store: store.name(),
                fingerprint: fingerprint.short(),
                error: &e,
            }
            .log();
        }
    }

    // Expired entries go first; if that frees nothing, the entry closest to
    // expiry is evicted.
    fn make_room(l1: &mut HashMap<Fingerprint, CacheEntry>, now: Instant, max_entries: usize) {
        let before = l1.len();
        l1.retain(|_, entry| !entry.is_expired(now));
        let purged_expired = before - l1.len();

        let mut evicted_live = 0;
        while l1.len() >= max_entries {
            let oldest = l1
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(fingerprint, _)| fingerprint.clone());
            match oldest {
                Some(fingerprint) => {
                    l1.remove(&fingerprint);
                    evicted_live += 1;
                }
                None => break,
            }
        }

        CacheCapacityReached {
            max_entries,
            purged_expired,
            evicted_live,
        }
        .log();
    }
}

fn clamp_ttl(ttl: Duration) -> Duration {
    ttl.min(Duration::from_secs(MAX_CACHE_TTL_SECONDS))
}

// A clamped TTL cannot overflow a monotonic clock; `now` is only a fallback.
fn expiry_after(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(clamp_ttl(ttl)).unwrap_or(now)
}

fn l2_key(fingerprint: &Fingerprint) -> String {
    format!("{}{}", L2_KEY_PREFIX, fingerprint)
}
