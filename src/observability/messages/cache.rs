// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the tiered cache.
//!
//! The shared tier is best-effort, so every problem with it is logged here and
//! never reported to a caller.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Cache hit in one of the tiers.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct CacheHit<'a> {
    pub fingerprint: &'a str,
    pub tier: &'a str,
}

impl Display for CacheHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cache hit in {} for {}", self.tier, self.fingerprint)
    }
}

impl StructuredLog for CacheHit<'_> {
    fn log(&self) {
        tracing::debug!(fingerprint = self.fingerprint, tier = self.tier, "{}", self);
    }
}

/// An expired L1 entry was evicted on read.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct CacheEntryExpired<'a> {
    pub fingerprint: &'a str,
}

impl Display for CacheEntryExpired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Evicted expired L1 entry {}", self.fingerprint)
    }
}

impl StructuredLog for CacheEntryExpired<'_> {
    fn log(&self) {
        tracing::debug!(fingerprint = self.fingerprint, "{}", self);
    }
}

/// L1 reached its entry bound and had to make room.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct CacheCapacityReached {
    pub max_entries: usize,
    pub purged_expired: usize,
    pub evicted_live: usize,
}

impl Display for CacheCapacityReached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "L1 cache full at {} entries: purged {} expired, evicted {} live",
            self.max_entries, self.purged_expired, self.evicted_live
        )
    }
}

impl StructuredLog for CacheCapacityReached {
    fn log(&self) {
        tracing::debug!(
            max_entries = self.max_entries,
            purged_expired = self.purged_expired,
            evicted_live = self.evicted_live,
            "{}", self
        );
    }
}

/// The shared tier could not be reached at construction; serving from L1 only.
///
/// # Log Level
/// `warn!` - Degraded behavior
///
/// # Example
/// ```
/// use the_gateway::observability::messages::cache::CacheDegraded;
///
/// let msg = CacheDegraded { store: "memory", reason: "connection refused" };
/// assert!(msg.to_string().contains("L1-only"));
/// ```
pub struct CacheDegraded<'a> {
    pub store: &'a str,
    pub reason: &'a str,
}

impl Display for CacheDegraded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shared cache '{}' unavailable, running L1-only: {}",
            self.store, self.reason
        )
    }
}

impl StructuredLog for CacheDegraded<'_> {
    fn log(&self) {
        tracing::warn!(store = self.store, reason = self.reason, "{}", self);
    }
}

/// A shared-tier read failed and was treated as a miss.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct L2ReadFailed<'a> {
    pub store: &'a str,
    pub fingerprint: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for L2ReadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shared cache '{}' read failed for {}, treating as miss: {}",
            self.store, self.fingerprint, self.error
        )
    }
}

impl StructuredLog for L2ReadFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            store = self.store,
            fingerprint = self.fingerprint,
            error = %self.error,
            "{}", self
        );
    }
}

/// A shared-tier write failed; the result stays in L1.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct L2WriteFailed<'a> {
    pub store: &'a str,
    pub fingerprint: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for L2WriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shared cache '{}' write failed for {}, kept in L1 only: {}",
            self.store, self.fingerprint, self.error
        )
    }
}

impl StructuredLog for L2WriteFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            store = self.store,
            fingerprint = self.fingerprint,
            error = %self.error,
            "{}", self
        );
    }
}
